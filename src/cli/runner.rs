//! CLI runner - executes commands

use crate::auth::Credentials;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::Client;
use crate::error::{Error, Result};
use crate::locator;
use crate::models::{InstanceQuery, TaskStatus};
use crate::types::{JsonObject, JsonValue, StringMap};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Credentials => self.credentials(),
            Commands::Workspaces => {
                let workspaces = self.client()?.organization()?.list_workspaces().await?;
                self.output(&workspaces)
            }
            Commands::Workspace { id } => {
                let info = self.client()?.organization()?.workspace(id).info().await?;
                self.output(&info)
            }
            Commands::Sources { workspace } => {
                let sources = self
                    .client()?
                    .organization()?
                    .workspace(workspace)
                    .list_sources()
                    .await?;
                self.output(&sources)
            }
            Commands::Source { workspace, id } => {
                let source = self
                    .client()?
                    .organization()?
                    .workspace(workspace)
                    .source(id)
                    .fetch()
                    .await?;
                self.output(&source)
            }
            Commands::Instances {
                workspace,
                source,
                where_clause,
                limit,
                csv,
            } => {
                let mut query = InstanceQuery::new();
                if let Some(clause) = where_clause {
                    query = query.filter(clause);
                }
                if let Some(limit) = limit {
                    query = query.limit(*limit);
                }
                let table = self
                    .client()?
                    .organization()?
                    .workspace(workspace)
                    .source(source)
                    .instances(&query)
                    .await?;
                if *csv {
                    print!("{}", table.to_csv());
                    Ok(())
                } else {
                    self.output(&table.records())
                }
            }
            Commands::Tasks { workspace, status } => {
                let ws = self.client()?.organization()?.workspace(workspace);
                let tasks = match status {
                    Some(status) => ws.tasks_by_status(status.parse::<TaskStatus>()?).await?,
                    None => ws.list_tasks().await?,
                };
                self.output(&tasks)
            }
            Commands::Call {
                method,
                path,
                params,
                headers,
                paginated,
            } => {
                let parameters = parse_params(params)?;
                let headers = parse_headers(headers)?;
                let endpoint = self.client()?.custom_endpoint()?;
                if *paginated {
                    let items = endpoint
                        .call_paginated(method, path, headers, parameters)
                        .await?;
                    self.output(&items)
                } else {
                    let body = endpoint.call(method, path, headers, parameters).await?;
                    self.output(&body)
                }
            }
            Commands::Locate { url } => self.output(&locator::parse_url(url)?),
        }
    }

    /// Resolve credentials from the flags, environment and config file
    fn resolve_credentials(&self) -> Result<Credentials> {
        let mut builder = Credentials::builder().explicit(
            self.cli.token.clone(),
            self.cli.organization.clone(),
            self.cli.instance.clone(),
        );
        if let Some(ref path) = self.cli.config_file {
            builder = builder.config_file(path);
        }
        builder.resolve()
    }

    fn client(&self) -> Result<Client> {
        let credentials = self.resolve_credentials()?;
        debug!("Using instance {}", credentials.instance());
        Client::new(credentials)
    }

    fn credentials(&self) -> Result<()> {
        let credentials = self.resolve_credentials()?;
        let origins = credentials.origins();
        self.output(&json!({
            "token": credentials.redacted_token(),
            "organization": credentials.organization_opt(),
            "instance": credentials.instance(),
            "origins": {
                "token": origins.token.to_string(),
                "organization": origins.organization.to_string(),
                "instance": origins.instance.to_string(),
            }
        }))
    }

    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

fn split_pair<'a>(pair: &'a str, what: &str) -> Result<(&'a str, &'a str)> {
    pair.split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim(), value))
        .ok_or_else(|| Error::validation("CLI_ARGUMENT", format!("Invalid {what} '{pair}', expected key=value")))
}

/// `key=value` pairs; values that parse as JSON are kept as JSON
fn parse_params(pairs: &[String]) -> Result<JsonObject> {
    let mut params = JsonObject::new();
    for pair in pairs {
        let (key, value) = split_pair(pair, "parameter")?;
        let value = serde_json::from_str(value).unwrap_or_else(|_| JsonValue::String(value.to_string()));
        params.insert(key.to_string(), value);
    }
    Ok(params)
}

fn parse_headers(pairs: &[String]) -> Result<StringMap> {
    pairs
        .iter()
        .map(|pair| {
            split_pair(pair, "header").map(|(key, value)| (key.to_string(), value.to_string()))
        })
        .collect()
}
