//! Workspace operations
//!
//! A workspace owns sources, tasks, alerts, models, dashboards and
//! visualizations. Listing endpoints are paginated; create endpoints answer
//! with the new object's id (`source_id`, `alert_id`, ...).

use super::source::SourceApi;
use super::task::{ResolveOptions, TaskApi};
use super::{Lookup, Scope};
use crate::decode::{self, Record};
use crate::error::{Error, Result};
use crate::models::{
    AlertInfo, DashboardInfo, InstanceTable, ModelInfo, NewAlert, NewDashboard, NewModel,
    NewVisualization, SourceFeature, SourceInfo, TaskInfo, TaskStatus, UpdateInstances,
    VisualizationInfo, WorkspaceInfo,
};
use crate::pagination;
use crate::types::{JsonValue, Method, StringMap};
use serde_json::json;
use tracing::{debug, info};

/// Outcome of a model training request
#[derive(Debug, Clone)]
pub enum ModelCreation {
    /// Training finished and the model was fetched
    Created(ModelInfo),
    /// Training was requested; the task is still running
    Pending(TaskApi),
}

/// Operations on one workspace
#[derive(Debug, Clone)]
pub struct WorkspaceApi {
    scope: Scope,
    workspace_id: String,
}

impl WorkspaceApi {
    pub(crate) fn new(scope: Scope, workspace_id: impl Into<String>) -> Self {
        Self {
            scope,
            workspace_id: workspace_id.into(),
        }
    }

    /// Workspace id
    pub fn id(&self) -> &str {
        &self.workspace_id
    }

    /// Owning organization id
    pub fn organization_id(&self) -> &str {
        self.scope.organization()
    }

    fn path(&self, rest: &str) -> String {
        if rest.is_empty() {
            format!("workspace/{}", self.workspace_id)
        } else {
            format!("workspace/{}/{rest}", self.workspace_id)
        }
    }

    async fn get<T: Record>(&self, rest: &str) -> Result<T> {
        self.scope
            .http()
            .request_record(Method::GET, &self.path(rest), self.scope.request())
            .await
    }

    async fn list<T: Record>(&self, rest: &str) -> Result<Vec<T>> {
        pagination::fetch_all(self.scope.http(), &self.path(rest), self.scope.request()).await
    }

    /// POST a create payload and return the id under `id_key`
    async fn create(&self, rest: &str, kind: &str, id_key: &str, body: JsonValue) -> Result<String> {
        let response = self
            .scope
            .http()
            .post(&self.path(rest), self.scope.request().json(body))
            .await?;
        let id = decode::id_field(kind, &response, id_key)?;
        info!("Created {} {} in workspace {}", kind, id, self.workspace_id);
        Ok(id)
    }

    async fn remove(&self, rest: &str) -> Result<()> {
        self.scope
            .http()
            .delete(&self.path(rest), self.scope.request())
            .await?;
        Ok(())
    }

    // ========================================================================
    // Workspace
    // ========================================================================

    /// Current workspace information
    pub async fn info(&self) -> Result<WorkspaceInfo> {
        self.get("").await
    }

    /// Rename or re-describe the workspace.
    ///
    /// Fields left as `None` keep their current values.
    pub async fn update(
        &self,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<WorkspaceInfo> {
        let mut info = self.info().await?;
        if let Some(name) = name {
            info.name = name.to_string();
        }
        if let Some(description) = description {
            info.description = description.to_string();
        }

        self.scope
            .http()
            .post(
                &self.path(""),
                self.scope
                    .request()
                    .json(json!({ "name": info.name, "description": info.description })),
            )
            .await?;
        Ok(info)
    }

    /// Delete the workspace and everything in it
    pub async fn delete(&self) -> Result<()> {
        self.remove("").await
    }

    // ========================================================================
    // Sources
    // ========================================================================

    /// Every source in the workspace
    pub async fn list_sources(&self) -> Result<Vec<SourceInfo>> {
        self.list("sources").await
    }

    /// First source matching the lookup
    pub async fn find_source(&self, lookup: Lookup<'_>) -> Result<Option<SourceInfo>> {
        let sources = self.list_sources().await?;
        Ok(sources.into_iter().find(|s| lookup.matches(&s.id, &s.name)))
    }

    /// Create a source with the given features
    pub async fn create_source(
        &self,
        name: &str,
        description: &str,
        features: &[SourceFeature],
    ) -> Result<SourceApi> {
        let features: Vec<JsonValue> = features.iter().map(SourceFeature::minimized).collect();
        let id = self
            .create(
                "sources",
                "source",
                "source_id",
                json!({ "name": name, "description": description, "features": features }),
            )
            .await?;
        Ok(self.source(id))
    }

    /// The source with this name, created empty if none exists
    pub async fn create_source_if_not_exists(&self, name: &str) -> Result<SourceApi> {
        if let Some(existing) = self.find_source(Lookup::Name(name)).await? {
            debug!("Source {} already exists ({})", name, existing.id);
            return Ok(self.source(existing.id));
        }
        self.create_source(name, "", &[]).await
    }

    /// Create a source shaped after `table` and upload its rows.
    ///
    /// Feature types are inferred from the values; `date_formats` assigns
    /// formats to date columns. With `wait`, the upload task is resolved
    /// before returning.
    pub async fn create_and_initialize_source(
        &self,
        name: &str,
        description: &str,
        table: &InstanceTable,
        date_formats: &StringMap,
        wait: bool,
    ) -> Result<SourceApi> {
        let features = table.infer_features(date_formats);
        let source = self.create_source(name, description, &features).await?;

        let task = source
            .update_instances(table, &UpdateInstances::append())
            .await?;
        if wait {
            task.resolve(&ResolveOptions::default()).await?;
        }
        Ok(source)
    }

    /// Upload `table` into the source named `name`, creating it if needed.
    ///
    /// An existing source whose features no longer match the table gets the
    /// inferred features first; with `delete_instances_on_feature_update`
    /// its rows are cleaned before that. Every task is resolved with
    /// `options` before returning.
    pub async fn create_else_update_source(
        &self,
        name: &str,
        table: &InstanceTable,
        date_formats: &StringMap,
        delete_instances_on_feature_update: bool,
        options: &ResolveOptions,
    ) -> Result<SourceApi> {
        let inferred = table.infer_features(date_formats);

        let source = match self.find_source(Lookup::Name(name)).await? {
            Some(existing) => {
                let source = self.source(existing.id);
                let current = source.features().await?;
                if features_changed(&current, &inferred) {
                    info!("Features of source {} changed, updating", source.id());
                    if delete_instances_on_feature_update {
                        source.clean_instances(None).await?.resolve(options).await?;
                    }
                    source.update_features(&inferred).await?.resolve(options).await?;
                }
                source
            }
            None => self.create_source(name, "", &inferred).await?,
        };

        source
            .update_instances(table, &UpdateInstances::append())
            .await?
            .resolve(options)
            .await?;
        Ok(source)
    }

    /// Handle for a source; no request is made
    pub fn source(&self, source_id: impl Into<String>) -> SourceApi {
        SourceApi::new(self.scope.clone(), self.workspace_id.clone(), source_id)
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    /// Every task in the workspace
    pub async fn list_tasks(&self) -> Result<Vec<TaskInfo>> {
        self.list("tasks").await
    }

    /// Tasks currently in the given state
    pub async fn tasks_by_status(&self, status: TaskStatus) -> Result<Vec<TaskInfo>> {
        let tasks = self.list_tasks().await?;
        Ok(tasks.into_iter().filter(|t| t.status == status).collect())
    }

    /// Handle for a task; no request is made
    pub fn task(&self, task_id: impl Into<String>) -> TaskApi {
        TaskApi::new(self.scope.clone(), self.workspace_id.clone(), task_id)
    }

    // ========================================================================
    // Alerts
    // ========================================================================

    /// Every alert in the workspace
    pub async fn list_alerts(&self) -> Result<Vec<AlertInfo>> {
        self.list("alerts").await
    }

    /// One alert
    pub async fn alert(&self, alert_id: &str) -> Result<AlertInfo> {
        self.get(&format!("alerts/{alert_id}")).await
    }

    /// Create an alert; values are checked before any request
    pub async fn create_alert(&self, alert: &NewAlert) -> Result<AlertInfo> {
        alert.validate()?;
        let id = self
            .create("alerts", AlertInfo::KIND, "alert_id", alert.to_body())
            .await?;
        self.alert(&id).await
    }

    /// Delete an alert
    pub async fn delete_alert(&self, alert_id: &str) -> Result<()> {
        self.remove(&format!("alerts/{alert_id}")).await
    }

    // ========================================================================
    // Models
    // ========================================================================

    /// Every model in the workspace
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.list("models").await
    }

    /// One model
    pub async fn model(&self, model_id: &str) -> Result<ModelInfo> {
        self.get(&format!("models/{model_id}")).await
    }

    /// Train a model.
    ///
    /// The method must suit the model type and the target must be a feature
    /// of the source; both are checked before training is requested. With
    /// `wait`, the training task is resolved and the new model fetched.
    pub async fn create_model(&self, model: &NewModel, wait: bool) -> Result<ModelCreation> {
        model.validate()?;

        let features = match self.source(&model.source_id).features().await {
            Ok(features) => features,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e),
        };
        let target = features
            .iter()
            .find(|f| f.name == model.target_feature)
            .ok_or_else(|| {
                Error::validation(
                    "SOURCE_MISMATCH",
                    "Provided source for model creation was not found or provided target feature is not configured in the source.",
                )
            })?;

        let task_id = self
            .create("models", "model task", "task_id", model.to_body(target.index))
            .await?;
        let task = self.task(task_id);
        if !wait {
            return Ok(ModelCreation::Pending(task));
        }

        task.resolve(&ResolveOptions::default()).await?;
        let result = task.result().await?;
        let model_id = decode::id_field("task result", &result, "model")?;
        Ok(ModelCreation::Created(self.model(&model_id).await?))
    }

    /// Delete a model
    pub async fn delete_model(&self, model_id: &str) -> Result<()> {
        self.remove(&format!("models/{model_id}")).await
    }

    // ========================================================================
    // Dashboards
    // ========================================================================

    /// Every dashboard in the workspace
    pub async fn list_dashboards(&self) -> Result<Vec<DashboardInfo>> {
        self.list("dashboards").await
    }

    /// One dashboard
    pub async fn dashboard(&self, dashboard_id: &str) -> Result<DashboardInfo> {
        self.get(&format!("dashboard/{dashboard_id}")).await
    }

    /// Create a dashboard
    pub async fn create_dashboard(&self, dashboard: &NewDashboard) -> Result<DashboardInfo> {
        let id = self
            .create("dashboards", DashboardInfo::KIND, "dashboard_id", dashboard.to_body())
            .await?;
        self.dashboard(&id).await
    }

    /// Delete a dashboard
    pub async fn delete_dashboard(&self, dashboard_id: &str) -> Result<()> {
        self.remove(&format!("dashboard/{dashboard_id}")).await
    }

    // ========================================================================
    // Visualizations
    // ========================================================================

    /// Every visualization in the workspace
    pub async fn list_visualizations(&self) -> Result<Vec<VisualizationInfo>> {
        self.list("visualizations").await
    }

    /// One visualization
    pub async fn visualization(&self, visualization_id: &str) -> Result<VisualizationInfo> {
        self.get(&format!("visualization/{visualization_id}")).await
    }

    /// Create a visualization
    pub async fn create_visualization(
        &self,
        visualization: &NewVisualization,
    ) -> Result<VisualizationInfo> {
        let id = self
            .create(
                "visualizations",
                VisualizationInfo::KIND,
                "visualization_id",
                visualization.to_body(),
            )
            .await?;
        self.visualization(&id).await
    }

    /// Delete a visualization
    pub async fn delete_visualization(&self, visualization_id: &str) -> Result<()> {
        self.remove(&format!("visualization/{visualization_id}")).await
    }
}

/// Whether some inferred feature has no counterpart in `current` with the
/// same name, type and date format
fn features_changed(current: &[SourceFeature], inferred: &[SourceFeature]) -> bool {
    inferred.iter().any(|new| {
        !current.iter().any(|f| {
            f.name == new.name
                && f.feature_type == new.feature_type
                && f.date_format == new.date_format
        })
    })
}
