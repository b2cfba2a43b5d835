//! Silverline CLI
//!
//! Command-line interface for managing F5 Silverline IP allow/deny lists.

use anyhow::Result;
use clap::Parser;
use silverlinectl::cli::{
    generate_completion, handle_add, handle_config, handle_delete, handle_list, handle_test, Cli,
    Commands, OutputFormat,
};
use silverlinectl::client::SilverlineClient;
use silverlinectl::config::CliConfig;

/// Name of the subcommand, used when reporting failures.
fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Test => "test",
        Commands::List { .. } => "list",
        Commands::Add { .. } => "add",
        Commands::Delete { .. } => "delete",
        Commands::Config { .. } => "config",
        Commands::Completion { .. } => "completion",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build configuration using priority chain: defaults → file → env → CLI args
    let mut builder = CliConfig::builder();

    if let Some(ref server) = cli.server {
        builder = builder.with_portal_url(server)?;
    }
    if let Some(ref token) = cli.token {
        builder = builder.with_api_key(token);
    }
    if let Some(ref format) = cli.format {
        let format_str = match format {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        };
        builder = builder.with_output_format(format_str)?;
    }
    if let Some(verbose) = cli.verbose {
        builder = builder.with_verbose(verbose);
    }
    if cli.insecure {
        builder = builder.with_verify_tls(false);
    }

    // Apply environment variable overrides
    builder = builder.with_env_overrides();

    // Load config file (unless --no-config is specified)
    builder = builder.with_config_file(cli.config.as_deref(), !cli.no_config)?;

    // Build final configuration with validation
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let output_format = match config.output_format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };
    let verbose = config.verbose;

    if verbose {
        eprintln!("Verbose mode enabled");
        eprintln!("Portal URL: {}", config.portal_url);
        eprintln!("Output format: {:?}", output_format);
        eprintln!("Verify TLS: {}", config.verify_tls);
        eprintln!("Proxy: {}", config.proxy);
    }

    // Commands that don't talk to the portal are handled before client creation
    match cli.command {
        Commands::Config { command } => {
            return handle_config(command, &config, &output_format).await;
        }
        Commands::Completion { shell } => {
            generate_completion(shell);
            return Ok(());
        }
        _ => {}
    }

    if config.api_key.is_empty() {
        eprintln!("Error: API key is not configured.");
        eprintln!("Set it with --token, SILVERLINE_TOKEN, or 'silverlinectl config set api_key <key>'.");
        std::process::exit(1);
    }

    let client = match SilverlineClient::with_config(
        &config.portal_url,
        &config.api_key,
        config.timeout,
        config.verify_tls,
        config.proxy,
        verbose,
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: Cannot create client for {}", config.portal_url);
            eprintln!("Client error: {}", e);
            std::process::exit(1);
        }
    };

    let name = command_name(&cli.command);
    let result = match cli.command {
        Commands::Test => handle_test(&client).await,
        Commands::List {
            list_type,
            object_ids,
            page_number,
            page_size,
        } => {
            handle_list(
                &client,
                list_type,
                object_ids,
                page_number,
                page_size,
                &output_format,
            )
            .await
        }
        Commands::Add {
            list_type,
            ip,
            list_target,
            mask,
            duration,
            note,
            tags,
        } => {
            handle_add(
                &client, list_type, ip, list_target, mask, duration, note, tags,
            )
            .await
        }
        Commands::Delete {
            list_type,
            object_id,
        } => handle_delete(&client, list_type, object_id).await,
        Commands::Config { .. } | Commands::Completion { .. } => unreachable!(),
    };

    if let Err(e) = result {
        eprintln!("Error: failed to execute '{}' command: {}", name, e);
        if verbose {
            eprintln!("Error details: {:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}
