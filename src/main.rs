// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! ctswitch CLI
//!
//! Fetches URLs through a client whose CT interceptor follows a preference
//! file, and flips that preference.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use ctswitch::{
    CertificateVerifier, CtConfig, HttpClient, InterceptorManager, JsonFilePreferences,
    PreferenceSource, Request, RequestLogger, SctPresenceVerifier, DEFAULT_PREFS_FILE,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ctswitch=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "fetch" => fetch(&args[2..]).await,
        "prefs" => prefs(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("ctswitch {}", ctswitch::VERSION);
            return ExitCode::SUCCESS;
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn print_usage() {
    println!(
        r#"ctswitch - Runtime-toggleable Certificate Transparency

USAGE:
    ctswitch <COMMAND> [OPTIONS]

COMMANDS:
    fetch <url>...          Fetch URLs concurrently, verifying CT when the preference is on
    prefs [on|off|show]     Show or change the CT preference
    help                    Print this help
    version                 Print version

OPTIONS:
    --prefs <file>          Preference file (default: $CTSWITCH_PREFS or {})
    --min-scts <n>          Embedded SCTs required (fetch only, default: 2)
    --timeout <secs>        Per-request timeout (fetch only, default: 30)
    --report-only           Log CT failures without failing requests
    --verbose               Log every request and response

ENVIRONMENT:
    RUST_LOG                Log filter (default: ctswitch=info)
"#,
        DEFAULT_PREFS_FILE
    );
}

/// Flags shared by every command
struct Options {
    prefs: JsonFilePreferences,
    min_scts: usize,
    timeout: Duration,
    report_only: bool,
    verbose: bool,
    positional: Vec<String>,
}

fn parse_options(args: &[String]) -> anyhow::Result<Options> {
    let mut prefs_path = env::var("CTSWITCH_PREFS").unwrap_or_else(|_| DEFAULT_PREFS_FILE.to_string());
    let mut min_scts = ctswitch::ct::DEFAULT_MIN_SCTS;
    let mut timeout = Duration::from_secs(30);
    let mut report_only = false;
    let mut verbose = false;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--prefs" => {
                prefs_path = iter.next().context("--prefs needs a file")?.clone();
            }
            "--min-scts" => {
                min_scts = iter
                    .next()
                    .context("--min-scts needs a number")?
                    .parse()
                    .context("--min-scts must be a number")?;
            }
            "--timeout" => {
                let secs: u64 = iter
                    .next()
                    .context("--timeout needs a number of seconds")?
                    .parse()
                    .context("--timeout must be a number")?;
                timeout = Duration::from_secs(secs);
            }
            "--report-only" => report_only = true,
            "--verbose" => verbose = true,
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            _ => positional.push(arg.clone()),
        }
    }

    Ok(Options {
        prefs: JsonFilePreferences::new(prefs_path),
        min_scts,
        timeout,
        report_only,
        verbose,
        positional,
    })
}

async fn fetch(args: &[String]) -> anyhow::Result<()> {
    let options = parse_options(args)?;
    if options.positional.is_empty() {
        bail!("Usage: ctswitch fetch <url>...");
    }

    let config = CtConfig::new().fail_on_error(!options.report_only);
    let min_scts = options.min_scts;
    let manager = Arc::new(
        InterceptorManager::new(Arc::new(options.prefs.clone()), move || {
            Ok(Arc::new(SctPresenceVerifier::new(min_scts)?) as Arc<dyn CertificateVerifier>)
        })
        .with_config(config),
    );

    let mut builder = HttpClient::builder().custom_config(manager.clone());
    if options.verbose {
        builder.add_network_interceptor(RequestLogger::default());
    }
    let client = builder.build().context("Failed to build HTTP client")?;

    println!(
        "CT verification: {}",
        if manager.is_enabled() { "on" } else { "off" }
    );

    let requests = options
        .positional
        .iter()
        .map(|url| Request::get(url).map(|r| r.timeout(options.timeout)))
        .collect::<ctswitch::Result<Vec<_>>>()
        .context("Invalid URL")?;

    let mut failed = 0;
    let results = client.execute_all(requests).await;
    for (url, result) in options.positional.iter().zip(results) {
        match result {
            Ok(response) => println!("{} {} ({} bytes)", response.status_code(), url, response.body_len()),
            Err(e) if e.is_certificate_transparency() => {
                failed += 1;
                println!("CT  {} {}", url, e);
            }
            Err(e) => {
                failed += 1;
                let hint = if e.is_recoverable() { " (retryable)" } else { "" };
                println!("ERR {} {}{}", url, e, hint);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} requests failed", failed, options.positional.len());
    }
    Ok(())
}

fn prefs(args: &[String]) -> anyhow::Result<()> {
    let options = parse_options(args)?;

    match options.positional.first().map(String::as_str) {
        None | Some("show") => {}
        Some("on") => options.prefs.store(true)?,
        Some("off") => options.prefs.store(false)?,
        Some(other) => bail!("Expected on, off or show, got '{}'", other),
    }

    let enabled = options
        .prefs
        .certificate_transparency_enabled()
        .with_context(|| format!("Reading {}", options.prefs.path().display()))?;
    println!(
        "{}: certificate transparency {}",
        options.prefs.path().display(),
        if enabled { "on" } else { "off" }
    );
    Ok(())
}
