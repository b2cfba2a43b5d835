//! Command execution handlers

use anyhow::Result;
use serde::Serialize;
use silverline_core::api::{AddIpObjectRequest, IpObject};
use silverline_core::error::SilverlineError;
use silverline_core::types::{ListType, PagingData};

use crate::client::{handle_paging, SilverlineClient};
use crate::config::CliConfig;
use crate::format::{
    format_ip_objects_table, format_paging, format_success, NO_RESULTS_WITH_PAGING,
};

use super::commands::*;

/// Guidance returned by the connectivity check on an authorization failure.
pub const AUTH_GUIDANCE: &str = "Authorization Error: make sure API Key is correctly set";

/// Structured output of the list command.
///
/// Keyed the way downstream consumers expect it: the object list under
/// `IPObjectList`, the paging descriptor under `Paging` (null when paging
/// was not requested or yielded nothing).
#[derive(Debug, Serialize)]
pub struct ListOutput {
    #[serde(rename = "IPObjectList")]
    pub ip_object_list: Vec<IpObject>,
    #[serde(rename = "Paging")]
    pub paging: Option<PagingData>,
}

/// Split comma-separated values out of repeatable arguments.
///
/// `--id a --id b,c` and `--id a,b,c` both mean `[a, b, c]`.
pub fn split_arg_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Probe connectivity and authentication with a GET on the denylist.
///
/// An authorization failure is mapped to a fixed guidance message instead of
/// an error; everything else propagates unchanged.
pub async fn check_connectivity(client: &SilverlineClient) -> Result<String> {
    match client.get_ip_objects(ListType::Denylist, None).await {
        Ok(_) => Ok("ok".to_string()),
        Err(SilverlineError::Unauthorized(_)) => Ok(AUTH_GUIDANCE.to_string()),
        Err(e) => Err(e.into()),
    }
}

/// Handle the test command
pub async fn handle_test(client: &SilverlineClient) -> Result<()> {
    let message = check_connectivity(client).await?;
    println!("{}", message);
    Ok(())
}

/// Run the list operation and shape both outputs.
///
/// With no ids this is one collection fetch; with ids it is one fetch per id
/// in input order, results concatenated. Paging parameters only affect the
/// collection fetch.
pub async fn list_ip_objects(
    client: &SilverlineClient,
    list_type: ListType,
    object_ids: &[String],
    page_number: Option<&str>,
    page_size: Option<&str>,
) -> Result<(ListOutput, String)> {
    let params = handle_paging(page_number, page_size)?;
    let paging_requested = params.is_some();

    let mut objects: Vec<IpObject> = Vec::new();
    let mut paging = None;

    if object_ids.is_empty() {
        let response = client.get_ip_objects(list_type, params.as_ref()).await?;
        let links = response.links.clone();
        objects = response.into_objects();

        if let Some(page) = &params {
            if !objects.is_empty() {
                paging = Some(PagingData::from_links(links.as_ref(), page.number, page.size));
            }
        }
    } else {
        for object_id in object_ids {
            let response = client
                .get_ip_object(list_type, object_id, params.as_ref())
                .await?;
            objects.extend(response.into_objects());
        }
    }

    let human_readable = if objects.is_empty() && paging_requested {
        NO_RESULTS_WITH_PAGING.to_string()
    } else {
        let mut text = format_ip_objects_table(&objects);
        if let Some(paging) = &paging {
            text.push('\n');
            text.push_str(&format_paging(paging));
        }
        text
    };

    Ok((
        ListOutput {
            ip_object_list: objects,
            paging,
        },
        human_readable,
    ))
}

/// Handle the list command
pub async fn handle_list(
    client: &SilverlineClient,
    list_type: ListTypeArg,
    object_ids: Vec<String>,
    page_number: Option<String>,
    page_size: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let object_ids = split_arg_list(&object_ids);
    let (output, human_readable) = list_ip_objects(
        client,
        list_type.into(),
        &object_ids,
        page_number.as_deref(),
        page_size.as_deref(),
    )
    .await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            println!("{}", human_readable);
        }
    }

    Ok(())
}

/// Handle the add command
#[allow(clippy::too_many_arguments)]
pub async fn handle_add(
    client: &SilverlineClient,
    list_type: ListTypeArg,
    ip: String,
    list_target: String,
    mask: String,
    duration: i64,
    note: String,
    tags: Option<String>,
) -> Result<()> {
    let list_type: ListType = list_type.into();
    let tags = tags.map(|t| split_arg_list(&[t])).unwrap_or_default();

    let request = AddIpObjectRequest::new(ip.clone(), list_target, mask, duration, note, tags);
    client.add_ip_object(list_type, &request).await?;

    println!(
        "{}",
        format_success(&format!(
            "IP object with IP address: {} added successfully into the {} list.",
            ip, list_type
        ))
    );
    Ok(())
}

/// Handle the delete command
pub async fn handle_delete(
    client: &SilverlineClient,
    list_type: ListTypeArg,
    object_id: String,
) -> Result<()> {
    let list_type: ListType = list_type.into();
    client.delete_ip_object(list_type, &object_id).await?;

    println!(
        "{}",
        format_success(&format!(
            "IP object with ID: {} deleted successfully from the {} list.",
            object_id, list_type
        ))
    );
    Ok(())
}

/// Handle config commands
pub async fn handle_config(
    command: ConfigCommands,
    current_config: &CliConfig,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => match format {
            OutputFormat::Json => {
                // Never echo the API key
                let mut shown = current_config.clone();
                if !shown.api_key.is_empty() {
                    shown.api_key = "<set>".to_string();
                }
                println!("{}", serde_json::to_string_pretty(&shown)?);
            }
            OutputFormat::Table => {
                println!("CLI Configuration:");
                println!("{:<20} Value", "Setting");
                println!("{}", "-".repeat(40));
                println!("{:<20} {}", "Portal URL", current_config.portal_url);
                println!(
                    "{:<20} {}",
                    "API Key",
                    if current_config.api_key.is_empty() {
                        "<not set>"
                    } else {
                        "<set>"
                    }
                );
                println!("{:<20} {}", "Output Format", current_config.output_format);
                println!("{:<20} {}", "Verbose", current_config.verbose);
                println!("{:<20} {}s", "Timeout", current_config.timeout);
                println!("{:<20} {}", "Verify TLS", current_config.verify_tls);
                println!("{:<20} {}", "Proxy", current_config.proxy);
            }
        },
        ConfigCommands::Set { key, value } => {
            let mut config = current_config.clone();
            let value_clone = value.clone();
            match key.as_str() {
                "portal_url" => config.portal_url = value,
                "api_key" => config.api_key = value,
                "output_format" => {
                    if ["table", "json"].contains(&value.as_str()) {
                        config.output_format = value;
                    } else {
                        return Err(anyhow::anyhow!(
                            "Invalid output format. Must be 'table' or 'json'"
                        ));
                    }
                }
                "verbose" => {
                    config.verbose = value.to_lowercase() == "true" || value == "1";
                }
                "timeout" => {
                    config.timeout = value
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid timeout value. Must be a number"))?;
                }
                "verify_tls" => {
                    config.verify_tls = value.to_lowercase() != "false" && value != "0";
                }
                "proxy" => {
                    config.proxy = value.to_lowercase() == "true" || value == "1";
                }
                _ => return Err(anyhow::anyhow!("Unknown config key: {}", key)),
            }

            config.save()?;
            let shown = if key == "api_key" {
                "<set>".to_string()
            } else {
                value_clone
            };
            println!("{}", format_success(&format!("Set {} = {}", key, shown)));
        }
        ConfigCommands::Reset => {
            let default_config = CliConfig::default();
            default_config.save()?;
            println!("{}", format_success("Configuration reset to defaults"));
        }
    }

    Ok(())
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
