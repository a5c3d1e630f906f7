use std::path::PathBuf;

use clap::Parser;
use hdlplan_resolver::PlanOptions;

/// hdlplan - Resolve hardware library manifests into an ordered build plan
#[derive(Parser, Debug)]
#[command(name = "hdlplan")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Library manifests, declared in the order given
    #[arg(required = true, value_name = "MANIFEST")]
    pub manifests: Vec<PathBuf>,

    /// Output format for the plan
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Fail if any warning is produced
    #[arg(long, default_value_t = false)]
    pub deny_warnings: bool,

    /// Skip checking that module templates exist
    #[arg(long, default_value_t = false)]
    pub no_template_check: bool,

    /// Print only the ordered group names
    #[arg(long, default_value_t = false)]
    pub order_only: bool,
}

impl Args {
    /// Convert command-line arguments into planner options
    pub fn to_options(&self) -> PlanOptions {
        PlanOptions::new()
            .with_check_templates(!self.no_template_check)
            .with_deny_warnings(self.deny_warnings)
    }
}

/// How the plan is written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Indented listing
    #[value(name = "text")]
    Text,
    /// The serialized plan
    #[value(name = "json")]
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["hdlplan", "std/library.toml"]).unwrap();
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.to_options(), PlanOptions::default());
    }

    #[rstest]
    #[case(&["--deny-warnings"], true, true)]
    #[case(&["--no-template-check"], false, false)]
    #[case(&["--deny-warnings", "--no-template-check"], false, true)]
    fn test_to_options(#[case] flags: &[&str], #[case] check: bool, #[case] deny: bool) {
        let argv = ["hdlplan"]
            .iter()
            .chain(flags)
            .chain(&["a.toml"])
            .copied();
        let options = Args::try_parse_from(argv).unwrap().to_options();
        assert_eq!(options.check_templates, check);
        assert_eq!(options.deny_warnings, deny);
    }

    #[test]
    fn test_manifest_required() {
        assert!(Args::try_parse_from(["hdlplan"]).is_err());
    }

    #[test]
    fn test_json_format() {
        let args = Args::try_parse_from(["hdlplan", "--format", "json", "a.toml", "b.toml"]).unwrap();
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.manifests.len(), 2);
    }
}
