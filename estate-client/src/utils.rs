use std::io::{self, Write};

/// Prompts on stdout and reads one line. An empty string on EOF.
pub fn read_input(name: &str) -> String {
    print!("{name}: ");
    let _ = io::stdout().flush();

    let mut input = String::new();
    if let Err(err) = io::stdin().read_line(&mut input) {
        tracing::warn!("Failed to read {name}: {err}");
    }
    input.trim_end_matches(['\r', '\n']).to_string()
}

pub fn read_input_hidden(name: &str) -> String {
    rpassword::prompt_password(format!("{name}: ")).unwrap_or_else(|err| {
        tracing::warn!("Failed to read {name}: {err}");
        String::new()
    })
}
