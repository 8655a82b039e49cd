use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use xunshubao_client::{DataInfoForm, Endpoint, QueryOutcome, SearchForm};

mod config;

#[derive(Parser)]
#[command(
    name = "xunshubao",
    version,
    about = "Query the Xunshubao V3 judicial-data verification API",
    long_about = None
)]
struct Cli {
    /// TOML credentials file; falls back to XSB_* environment variables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify whether a subject appears in one judicial registry.
    Check(CheckArgs),
    /// Query enforcement-disclosure records for a subject.
    Query(QueryArgs),
    /// Fetch the detail of a single record by identifier.
    #[command(name = "data-info")]
    DataInfo(DataInfoArgs),
}

/// Judicial registries exposed by the verification endpoints.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Registry {
    /// Enforcement disclosure.
    Zxgk,
    /// Dishonest judgment debtors.
    Shixin,
    /// Consumption restrictions.
    Xgl,
    /// Enforced debtors.
    Zhixing,
    /// Terminated enforcement cases.
    Zhongben,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Subject {
    Company,
    Person,
}

#[derive(Args)]
struct CheckArgs {
    #[arg(long, value_enum)]
    registry: Registry,
    #[arg(long, value_enum)]
    subject: Subject,
    #[command(flatten)]
    form: FormArgs,
}

#[derive(Args)]
struct QueryArgs {
    #[arg(long, value_enum)]
    subject: Subject,
    #[command(flatten)]
    form: FormArgs,
    /// Court case number to narrow the query.
    #[arg(long)]
    case_code: Option<String>,
}

#[derive(Args)]
struct DataInfoArgs {
    /// Registry the record belongs to, e.g. zhixing.
    #[arg(long)]
    data_type: String,
    /// Record identifier returned by a previous query.
    #[arg(long)]
    data_id: String,
}

#[derive(Args)]
struct FormArgs {
    /// Person or company name.
    #[arg(long)]
    name: String,
    /// Identity document number.
    #[arg(long)]
    card_num: Option<String>,
    /// Submit the SM3 digest of the card number instead of the plaintext.
    #[arg(long, requires = "card_num")]
    hash_card_num: bool,
    #[arg(long, default_value_t = 1)]
    page_no: u32,
    #[arg(long, default_value_t = 10)]
    page_size: u32,
}

impl FormArgs {
    fn build(&self) -> SearchForm {
        let mut form = SearchForm::named(&self.name).with_page(self.page_no, self.page_size);
        form = match &self.card_num {
            Some(card_num) if self.hash_card_num => form.with_hashed_card_num(card_num),
            Some(card_num) => form.with_card_num(card_num.clone()),
            None => form,
        };
        form
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let client = config::Settings::load(cli.config.as_deref())?.into_client()?;
    let request_id = Uuid::new_v4().simple().to_string();

    let outcome = match cli.command {
        Commands::Check(args) => {
            let endpoint = check_endpoint(args.registry, args.subject);
            client.query(endpoint, &request_id, &args.form.build())?
        }
        Commands::Query(args) => {
            let endpoint = match args.subject {
                Subject::Company => Endpoint::ZxgkQueryCompany,
                Subject::Person => Endpoint::ZxgkQueryPerson,
            };
            let mut form = args.form.build();
            if let Some(case_code) = args.case_code {
                form = form.with_case_code(case_code);
            }
            client.query(endpoint, &request_id, &form)?
        }
        Commands::DataInfo(args) => {
            let form = DataInfoForm::new(args.data_type, args.data_id);
            client.query(Endpoint::SifaDataInfo, &request_id, &form)?
        }
    };

    report(&request_id, outcome)
}

fn init_tracing() {
    let subscriber = tracing_subscriber::fmt().with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    );
    let _ = subscriber.try_init();
}

fn check_endpoint(registry: Registry, subject: Subject) -> Endpoint {
    match (registry, subject) {
        (Registry::Zxgk, Subject::Company) => Endpoint::ZxgkCheckCompany,
        (Registry::Zxgk, Subject::Person) => Endpoint::ZxgkCheckPerson,
        (Registry::Shixin, Subject::Company) => Endpoint::ShixinCheckCompany,
        (Registry::Shixin, Subject::Person) => Endpoint::ShixinCheckPerson,
        (Registry::Xgl, Subject::Company) => Endpoint::XglCheckCompany,
        (Registry::Xgl, Subject::Person) => Endpoint::XglCheckPerson,
        (Registry::Zhixing, Subject::Company) => Endpoint::ZhixingCheckCompany,
        (Registry::Zhixing, Subject::Person) => Endpoint::ZhixingCheckPerson,
        (Registry::Zhongben, Subject::Company) => Endpoint::ZhongbenCheckCompany,
        (Registry::Zhongben, Subject::Person) => Endpoint::ZhongbenCheckPerson,
    }
}

/// Prints the decrypted payload, pretty-printed when it is JSON.
fn report(request_id: &str, outcome: QueryOutcome) -> Result<()> {
    if !outcome.is_success() {
        tracing::warn!(
            request_id,
            code = %outcome.code,
            msg = %outcome.msg,
            "service rejected request",
        );
        bail!(
            "service rejected request {request_id}: code={} msg={}",
            outcome.code,
            outcome.msg
        );
    }
    tracing::info!(request_id, "request succeeded");
    let data = outcome
        .data
        .context("success response carried no payload")?;
    match serde_json::from_str::<serde_json::Value>(&data) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{data}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn every_registry_and_subject_maps_to_a_check_endpoint() {
        let registries = [
            Registry::Zxgk,
            Registry::Shixin,
            Registry::Xgl,
            Registry::Zhixing,
            Registry::Zhongben,
        ];
        let mut seen = std::collections::HashSet::new();
        for registry in registries {
            for subject in [Subject::Company, Subject::Person] {
                assert!(seen.insert(check_endpoint(registry, subject)));
            }
        }
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn report_surfaces_the_rejection_code_and_message() {
        let outcome = QueryOutcome {
            code: "1001".to_string(),
            msg: "not found".to_string(),
            data: None,
        };
        let err = report("req-1", outcome).expect_err("err");
        let text = err.to_string();
        assert!(text.contains("1001"));
        assert!(text.contains("not found"));
    }

    #[test]
    fn report_accepts_a_successful_outcome() {
        let outcome = QueryOutcome {
            code: "0000".to_string(),
            msg: "OK".to_string(),
            data: Some(r#"{"total":0}"#.to_string()),
        };
        report("req-2", outcome).expect("report");
    }

    #[test]
    fn hashed_card_num_flag_replaces_the_plaintext() {
        let args = FormArgs {
            name: "姓名".to_string(),
            card_num: Some("110101199001011234".to_string()),
            hash_card_num: true,
            page_no: 2,
            page_size: 20,
        };
        let form = args.build();
        assert_eq!(form.hash_param, "cardNum");
        assert_ne!(form.card_num, "110101199001011234");
        assert_eq!(form.page_no, 2);
        assert_eq!(form.page_size, 20);
    }
}
