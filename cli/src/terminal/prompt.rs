use console::Term;

/// Asks for the token symbol on the terminal.
///
/// Returns an empty string when stdin is not interactive.
pub fn ask_symbol() -> std::io::Result<String> {
    let term = Term::stderr();
    term.write_str("Token symbol to distribute (as recorded in the registry): ")?;
    term.read_line()
}
