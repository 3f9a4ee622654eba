use std::io::{self, BufRead, Write};

const CONFIRMATIONS: [&str; 2] = ["y", "yes"];

/// Ask on stdout and block on one line from stdin. Only an exact "y" or
/// "yes" confirms; anything else, including EOF, declines.
pub fn confirm(question: &str) -> bool {
    print!("{question} ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    CONFIRMATIONS.contains(&answer.trim())
}
