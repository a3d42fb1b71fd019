use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "recordesk", version, about = "Terminal forms for contacts, expenses and greetings")]
pub struct Args {
    /// Form shown at startup
    #[arg(short, long, value_enum, default_value_t = FormKind::Contacts)]
    pub form: FormKind,

    /// Simulated backend latency in milliseconds (overrides the config file)
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// JSON file records are stored in (overrides the config file)
    #[arg(long)]
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormKind {
    Contacts,
    Expenses,
    Greeting,
}

impl FormKind {
    /// Tab index of this form in the App.
    pub const fn tab_index(self) -> usize {
        match self {
            Self::Contacts => 0,
            Self::Expenses => 1,
            Self::Greeting => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from(["recordesk", "--form", "expenses", "--latency-ms", "0"]);
        assert_eq!(args.form, FormKind::Expenses);
        assert_eq!(args.latency_ms, Some(0));
        assert!(args.data_file.is_none());
    }

    #[test]
    fn defaults_to_contacts() {
        let args = Args::parse_from(["recordesk"]);
        assert_eq!(args.form.tab_index(), 0);
    }
}
