//! Output formatting for CLI commands.

/// Output format selection.
#[derive(Clone, Copy)]
pub enum Format {
    Table,
    Json,
}

impl From<crate::OutputFormat> for Format {
    fn from(f: crate::OutputFormat) -> Self {
        match f {
            crate::OutputFormat::Table => Format::Table,
            crate::OutputFormat::Json => Format::Json,
        }
    }
}

/// Prints a key/value listing as an aligned two-column layout, or as a JSON
/// object when `format` is [`Format::Json`].
pub fn print_key_value_table(items: &[(&str, String)], format: Format, quiet: bool) {
    if quiet {
        return;
    }

    match format {
        Format::Json => {
            let map: std::collections::HashMap<&str, &str> =
                items.iter().map(|(k, v)| (*k, v.as_str())).collect();
            println!("{}", serde_json::to_string_pretty(&map).unwrap());
        }
        Format::Table => {
            let width = items.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
            for (key, value) in items {
                println!("{key:width$} : {value}");
            }
        }
    }
}

/// Prints a status message (respects quiet mode).
pub fn status(msg: &str, quiet: bool) {
    if !quiet {
        println!("{msg}");
    }
}

/// Prints a success message.
pub fn success(msg: &str, quiet: bool) {
    if !quiet {
        println!("done: {msg}");
    }
}
