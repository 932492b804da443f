use std::path::PathBuf;

use clap::Parser;
use rfp_core::Field;

/// Submit a proposal request to the agent backend, or preview the workflow
/// offline when no backend answers.
#[derive(Debug, Parser)]
#[command(name = "rfp", version)]
pub struct Cli {
    /// Company website to crawl.
    #[arg(long)]
    pub company_url: Option<String>,

    /// Drug or product name the outreach is about.
    #[arg(long)]
    pub drug_name: Option<String>,

    /// Trial identifiers or paper references, free text.
    #[arg(long)]
    pub trials_papers: Option<String>,

    /// Target doctor specialties, free text.
    #[arg(long)]
    pub doctor_types: Option<String>,

    /// Backend origin; `/api/health` and `/api/rfp` are appended.
    #[arg(long)]
    pub api_base: Option<String>,

    /// Directory the brief is saved into.
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Save the brief when the backend returns one.
    #[arg(long)]
    pub download: bool,

    /// RON configuration file (defaults to ./rfp.ron when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write diagnostic logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Field values to type into the form, or `None` when no form field was
    /// given at all.
    pub fn form_fields(&self) -> Option<Vec<(Field, String)>> {
        let entries = [
            (Field::CompanyUrl, &self.company_url),
            (Field::DrugName, &self.drug_name),
            (Field::TrialsPapers, &self.trials_papers),
            (Field::DoctorTypes, &self.doctor_types),
        ];
        if entries.iter().all(|(_, value)| value.is_none()) {
            return None;
        }
        Some(
            entries
                .into_iter()
                .map(|(field, value)| (field, value.clone().unwrap_or_default()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_fields_means_no_form() {
        let cli = Cli::parse_from(["rfp", "--download"]);
        assert!(cli.form_fields().is_none());
        assert!(cli.download);
    }

    #[test]
    fn missing_fields_are_submitted_empty() {
        let cli = Cli::parse_from(["rfp", "--company-url", "https://acme.example"]);
        let fields = cli.form_fields().unwrap();
        assert_eq!(fields.len(), 4);
        assert_eq!(
            fields[0],
            (Field::CompanyUrl, "https://acme.example".to_string())
        );
        assert_eq!(fields[1], (Field::DrugName, String::new()));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
