//! ls command - Run one listing request against the configured catalog
//!
//! Goes through the same handler as the HTTP gateway, so the result is what
//! an S3 client would see for the equivalent `GET /{repository}`.

use clap::Args;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use lg_core::Config;
use lg_s3::{CommonPrefix, Contents, ErrorKind, ListObjectsOutput, QueryParams};
use serde::Serialize;

use super::{build_handler, exit_code_for};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Run one listing request and print the result
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Repository (bucket) to list
    pub repository: String,

    /// Key prefix: `ref` lists branches, `ref/path` lists entries
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// Group keys into common prefixes (only "/" is supported)
    #[arg(short, long, default_value = "")]
    pub delimiter: String,

    /// Page size
    #[arg(short, long)]
    pub max_keys: Option<String>,

    /// ListObjects protocol version (1 or 2)
    #[arg(long, default_value = "2")]
    pub list_type: String,

    /// Resume cursor (marker for V1, continuation token for V2)
    #[arg(short, long)]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
struct ObjectOutput {
    key: String,
    last_modified: String,
    etag: String,
    size_bytes: i64,
    size_human: String,
}

#[derive(Debug, Serialize)]
struct LsOutput {
    repository: String,
    prefix: String,
    delimiter: String,
    key_count: usize,
    max_keys: usize,
    is_truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
    common_prefixes: Vec<String>,
    contents: Vec<ObjectOutput>,
}

impl LsArgs {
    fn query_params(&self) -> QueryParams {
        let mut pairs = vec![
            ("list-type", self.list_type.clone()),
            ("prefix", self.prefix.clone()),
            ("delimiter", self.delimiter.clone()),
        ];
        if let Some(max_keys) = &self.max_keys {
            pairs.push(("max-keys", max_keys.clone()));
        }
        if let Some(cursor) = &self.cursor {
            let key = if self.list_type == "2" {
                "continuation-token"
            } else {
                "marker"
            };
            pairs.push((key, cursor.clone()));
        }
        QueryParams::from_pairs(pairs)
    }
}

/// Execute the ls command
pub async fn execute(args: LsArgs, config: &Config, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let handler = match build_handler(config) {
        Ok(h) => h,
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            return exit_code_for(&e);
        }
    };

    let params = args.query_params();
    let output = match handler.handle(&args.repository, &params).await {
        Ok(o) => o,
        Err(e) => {
            formatter.error(&e.to_string());
            return match e.kind {
                ErrorKind::BadRequest => ExitCode::UsageError,
                ErrorKind::InternalError => ExitCode::GeneralError,
            };
        }
    };

    let Some(result) = LsOutput::from_output(output) else {
        formatter.error("Unexpected response to a listing request");
        return ExitCode::GeneralError;
    };

    if formatter.is_json() {
        formatter.json(&result);
    } else {
        print_table(&result, &formatter);
    }
    ExitCode::Success
}

impl LsOutput {
    fn from_output(output: ListObjectsOutput) -> Option<Self> {
        match output {
            ListObjectsOutput::Versioning => None,
            ListObjectsOutput::V1(r) => Some(Self::build(
                r.name,
                r.prefix,
                r.delimiter,
                r.key_count,
                r.max_keys,
                r.is_truncated,
                r.next_marker,
                r.common_prefixes,
                r.contents,
            )),
            ListObjectsOutput::V2(r) => Some(Self::build(
                r.name,
                r.prefix,
                r.delimiter,
                r.key_count,
                r.max_keys,
                r.is_truncated,
                r.next_continuation_token,
                r.common_prefixes,
                r.contents,
            )),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        repository: String,
        prefix: String,
        delimiter: String,
        key_count: usize,
        max_keys: usize,
        is_truncated: bool,
        next_cursor: Option<String>,
        common_prefixes: Vec<CommonPrefix>,
        contents: Vec<Contents>,
    ) -> Self {
        Self {
            repository,
            prefix,
            delimiter,
            key_count,
            max_keys,
            is_truncated,
            next_cursor,
            common_prefixes: common_prefixes.into_iter().map(|p| p.prefix).collect(),
            contents: contents
                .into_iter()
                .map(|c| ObjectOutput {
                    size_human: format_size(c.size),
                    key: c.key,
                    last_modified: c.last_modified,
                    etag: c.etag,
                    size_bytes: c.size,
                })
                .collect(),
        }
    }
}

fn format_size(size: i64) -> String {
    humansize::format_size(size.max(0) as u64, humansize::BINARY)
}

fn print_table(result: &LsOutput, formatter: &Formatter) {
    if result.common_prefixes.is_empty() && result.contents.is_empty() {
        formatter.println("(empty)");
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Key", "Size", "Last Modified"]);

        for prefix in &result.common_prefixes {
            table.add_row(vec![prefix.clone(), "PRE".to_string(), String::new()]);
        }
        for object in &result.contents {
            table.add_row(vec![
                object.key.clone(),
                object.size_human.clone(),
                object.last_modified.clone(),
            ]);
        }
        formatter.println(&table.to_string());
    }

    let summary = format!(
        "{} prefixes, {} objects",
        result.common_prefixes.len(),
        formatter.style_size(&result.contents.len().to_string())
    );
    formatter.println(&summary);

    if let Some(cursor) = &result.next_cursor {
        formatter.println(&format!(
            "More results available, resume with --cursor {}",
            formatter.style_prefix(cursor)
        ));
    } else if result.is_truncated {
        formatter.println(&formatter.style_date("Truncated; no resume cursor for this listing"));
    }
}
