#![cfg(test)]
mod scenarios;
