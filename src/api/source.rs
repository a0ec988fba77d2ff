//! Source operations

use super::task::TaskApi;
use super::Scope;
use crate::decode;
use crate::error::Result;
use crate::models::{InstanceQuery, InstanceTable, Source, SourceFeature, UpdateInstances};
use crate::types::JsonValue;
use serde_json::json;
use tracing::debug;

/// Find a feature by column index or by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureRef<'a> {
    /// Zero-based column index
    Index(u64),
    /// Exact column name
    Name(&'a str),
}

/// Operations on one source
#[derive(Debug, Clone)]
pub struct SourceApi {
    scope: Scope,
    workspace_id: String,
    source_id: String,
}

impl SourceApi {
    pub(crate) fn new(
        scope: Scope,
        workspace_id: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            scope,
            workspace_id: workspace_id.into(),
            source_id: source_id.into(),
        }
    }

    /// Source id
    pub fn id(&self) -> &str {
        &self.source_id
    }

    /// Owning workspace id
    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    fn path(&self, rest: &str) -> String {
        if rest.is_empty() {
            format!("workspace/{}/source/{}", self.workspace_id, self.source_id)
        } else {
            format!(
                "workspace/{}/source/{}/{rest}",
                self.workspace_id, self.source_id
            )
        }
    }

    fn task(&self, response: &JsonValue) -> Result<TaskApi> {
        let task_id = decode::id_field("source task", response, "task_id")?;
        debug!("Source {} started task {}", self.source_id, task_id);
        Ok(TaskApi::new(
            self.scope.clone(),
            self.workspace_id.clone(),
            task_id,
        ))
    }

    /// The source, mapped to its variant by `type`
    pub async fn fetch(&self) -> Result<Source> {
        let body = self
            .scope
            .http()
            .get(&self.path(""), self.scope.request())
            .await?;
        decode::decode(body)
    }

    /// Rename or re-describe the source.
    ///
    /// Fields left as `None` keep their current values.
    pub async fn update(&self, name: Option<&str>, description: Option<&str>) -> Result<Source> {
        let mut source = self.fetch().await?;
        let info = match &mut source {
            Source::Standard(s) => &mut s.info,
            Source::RealTime(s) => &mut s.info,
            Source::External(s) => &mut s.info,
        };
        if let Some(name) = name {
            info.name = name.to_string();
        }
        if let Some(description) = description {
            info.description = description.to_string();
        }
        let body = json!({ "name": info.name, "description": info.description });

        self.scope
            .http()
            .post(&self.path(""), self.scope.request().json(body))
            .await?;
        Ok(source)
    }

    /// Delete the source
    pub async fn delete(&self) -> Result<()> {
        self.scope
            .http()
            .delete(&self.path(""), self.scope.request())
            .await?;
        Ok(())
    }

    // ========================================================================
    // Features
    // ========================================================================

    /// Every feature, in column order
    pub async fn features(&self) -> Result<Vec<SourceFeature>> {
        let body = self
            .scope
            .http()
            .get(&self.path("features"), self.scope.request())
            .await?;
        let mut features: Vec<SourceFeature> = decode::decode_list(body)?;
        features.sort_by_key(|f| f.index);
        Ok(features)
    }

    /// One feature, if present
    pub async fn feature(&self, feature: FeatureRef<'_>) -> Result<Option<SourceFeature>> {
        let features = self.features().await?;
        Ok(features.into_iter().find(|f| match feature {
            FeatureRef::Index(index) => f.index == index,
            FeatureRef::Name(name) => f.name == name,
        }))
    }

    /// Replace the feature definitions; the platform applies them in a task
    pub async fn update_features(&self, features: &[SourceFeature]) -> Result<TaskApi> {
        let features: Vec<JsonValue> = features.iter().map(SourceFeature::minimized).collect();
        let response = self
            .scope
            .http()
            .post(
                &self.path("features"),
                self.scope.request().json(json!({ "features": features })),
            )
            .await?;
        self.task(&response)
    }

    // ========================================================================
    // Instances
    // ========================================================================

    /// Rows matching the query
    pub async fn instances(&self, query: &InstanceQuery) -> Result<InstanceTable> {
        let mut config = self.scope.request();
        for (key, value) in query.to_query() {
            config = config.query(key, value);
        }
        let body = self
            .scope
            .http()
            .get(&self.path("instances"), config)
            .await?;
        decode::decode(body)
    }

    /// Upload rows; the data is sent as CSV and loaded in a task
    pub async fn update_instances(
        &self,
        table: &InstanceTable,
        options: &UpdateInstances,
    ) -> Result<TaskApi> {
        debug!(
            "Uploading {} rows to source {} (replace: {})",
            table.len(),
            self.source_id,
            options.replace
        );
        let response = self
            .scope
            .http()
            .post(
                &self.path("instances"),
                self.scope.request().json(options.to_body(table)),
            )
            .await?;
        self.task(&response)
    }

    /// Delete rows matching `where_clause`, or every row if `None`
    pub async fn clean_instances(&self, where_clause: Option<&str>) -> Result<TaskApi> {
        let mut config = self.scope.request();
        if let Some(clause) = where_clause {
            config = config.json(json!({ "where": clause }));
        }
        let response = self
            .scope
            .http()
            .delete(&self.path("instances"), config)
            .await?;
        self.task(&response)
    }
}
