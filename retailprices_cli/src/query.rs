//! The price query: validates flags, runs the pipeline, prints the result.

use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use retailprices_lib::validation;
use retailprices_lib::{Constraint, PageFetcher, Pipeline};

use crate::output::{render, OutputFormat};

/// Currency used when none is given.
pub const DEFAULT_CURRENCY: &str = "GBP";

/// Filter and column flags.
///
/// Repeated `--limit` values for the same field are OR'd together, different
/// fields are AND'd. See
/// https://learn.microsoft.com/en-us/rest/api/cost-management/retail-prices/azure-retail-prices
/// for the available fields.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Limit results to records whose FIELD equals VALUE (repeatable)
    #[arg(long, num_args = 2, value_names = ["FIELD", "VALUE"])]
    pub limit: Vec<String>,

    /// Field to show as a column, in order (repeatable; default: a common set)
    #[arg(long, value_name = "FIELD")]
    pub select: Vec<String>,

    /// Currency to quote prices in
    #[arg(long, default_value = DEFAULT_CURRENCY, env = "AZURE_PRICES_CURRENCY")]
    pub currency: String,

    /// API version to request (e.g. 2023-01-01-preview)
    #[arg(long, env = "AZURE_PRICES_API_VERSION")]
    pub api_version: Option<String>,
}

/// Turns the flattened `--limit` values into validated constraints.
fn parse_limits(values: &[String]) -> Result<Vec<Constraint>> {
    if values.len() % 2 != 0 {
        bail!("--limit takes a FIELD and a VALUE");
    }
    let constraints = values
        .chunks_exact(2)
        .map(|pair| validation::validate_constraint(&pair[0], &pair[1]))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(constraints)
}

fn spinner() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message("Querying Azure retail prices...");
    Ok(pb)
}

/// Runs one query and writes the rendered result to `out`. Nothing is
/// written unless every page was fetched successfully.
pub async fn run<W: Write>(
    args: &QueryArgs,
    fetcher: &PageFetcher,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let constraints = parse_limits(&args.limit)?;
    let columns = validation::validate_columns(&args.select)?;
    let currency = validation::validate_currency(&args.currency)?;

    let mut pipeline = Pipeline::new(fetcher, &constraints, columns).with_currency(&currency);
    if let Some(api_version) = &args.api_version {
        let api_version = validation::sanitize_text(api_version, 32)?;
        pipeline = pipeline.with_api_version(&api_version);
    }

    let pb = spinner()?;
    let result = pipeline
        .collect(|fetched, kept| pb.set_message(format!("{} records fetched, {} kept", fetched, kept)))
        .await;
    pb.finish_and_clear();
    let output = result?;

    if output.rows.is_empty() {
        eprintln!("No matching prices found.");
    } else {
        eprintln!(
            "{} of {} price records matched",
            output.rows.len(),
            output.records_fetched
        );
    }

    render(format, &output.columns, &output.rows, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use retailprices_lib::{Client, RetryConfig};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PRICES_PATH: &str = "/api/retail/prices";

    fn fetcher_for(server: &MockServer) -> PageFetcher {
        let client = Client::with_endpoint(&format!("{}{}", server.uri(), PRICES_PATH)).unwrap();
        PageFetcher::new(client).with_retry(RetryConfig {
            max_retries: 1,
            base_delay_ms: 1,
            max_delay_ms: 2,
        })
    }

    fn args(limits: &[(&str, &str)], select: &[&str]) -> QueryArgs {
        QueryArgs {
            limit: limits
                .iter()
                .flat_map(|(f, v)| [f.to_string(), v.to_string()])
                .collect(),
            select: select.iter().map(|s| s.to_string()).collect(),
            currency: DEFAULT_CURRENCY.to_string(),
            api_version: None,
        }
    }

    #[test]
    fn parse_limits_pairs_up_values() {
        let constraints = parse_limits(&[
            "armRegionName".to_string(),
            "westeurope".to_string(),
            "priceType".to_string(),
            "Consumption".to_string(),
        ])
        .unwrap();
        assert_eq!(
            constraints,
            vec![
                Constraint::new("armRegionName", "westeurope"),
                Constraint::new("priceType", "Consumption"),
            ]
        );
    }

    #[test]
    fn parse_limits_rejects_odd_count() {
        assert!(parse_limits(&["armRegionName".to_string()]).is_err());
    }

    #[test]
    fn parse_limits_rejects_bad_field() {
        assert!(parse_limits(&["arm Region".to_string(), "x".to_string()]).is_err());
    }

    #[tokio::test]
    async fn renders_all_pages() {
        let mock_server = MockServer::start().await;
        let next = format!("{}{}?currencyCode='GBP'&$skip=2", mock_server.uri(), PRICES_PATH);
        Mock::given(method("GET"))
            .and(path(PRICES_PATH))
            .and(query_param_is_missing("$skip"))
            .and(query_param(
                "$filter",
                "(armSkuName eq 'Standard_HC44rs') and (armRegionName eq 'westeurope') and (priceType eq 'Consumption')",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Items": [
                    {"skuId": "A/1", "armSkuName": "Standard_HC44rs", "retailPrice": 2.8728},
                    {"skuId": "A/2", "armSkuName": "Standard_HC44rs", "retailPrice": 0.5746}
                ],
                "NextPageLink": next,
                "Count": 2
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(PRICES_PATH))
            .and(query_param("$skip", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Items": [{"skuId": "B/1", "armSkuName": "Standard_HC44rs", "retailPrice": 13480.0}],
                "NextPageLink": null,
                "Count": 1
            })))
            .mount(&mock_server)
            .await;

        let fetcher = fetcher_for(&mock_server);
        let args = args(
            &[
                ("armSkuName", "Standard_HC44rs"),
                ("armRegionName", "westeurope"),
                ("priceType", "Consumption"),
            ],
            &["skuId", "armSkuName", "retailPrice"],
        );
        let mut out = Vec::new();
        run(&args, &fetcher, OutputFormat::Csv, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "skuId,armSkuName,retailPrice",
                "A/1,Standard_HC44rs,2.8728",
                "A/2,Standard_HC44rs,0.5746",
                "B/1,Standard_HC44rs,13480.0",
            ]
        );
    }

    #[tokio::test]
    async fn bad_request_prints_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PRICES_PATH))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid OData filter"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = fetcher_for(&mock_server);
        let mut out = Vec::new();
        let err = run(
            &args(&[("armSkuNme", "Standard_HC44rs")], &[]),
            &fetcher,
            OutputFormat::Table,
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(out.is_empty());
        assert!(format!("{:#}", err).contains("Invalid OData filter"));
    }

    #[tokio::test]
    async fn invalid_currency_makes_no_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Items": []})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let fetcher = fetcher_for(&mock_server);
        let mut query_args = args(&[], &[]);
        query_args.currency = "XYZ".to_string();
        let mut out = Vec::new();
        assert!(run(&query_args, &fetcher, OutputFormat::Table, &mut out)
            .await
            .is_err());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn empty_result_renders_header() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PRICES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Items": [],
                "NextPageLink": null,
                "Count": 0
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = fetcher_for(&mock_server);
        let mut out = Vec::new();
        run(&args(&[], &["skuId", "retailPrice"]), &fetcher, OutputFormat::Tsv, &mut out)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap().lines().collect::<Vec<_>>(),
            vec!["skuId\tretailPrice"]
        );
    }
}
