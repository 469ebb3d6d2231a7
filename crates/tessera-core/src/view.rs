//! View context shared with templates
//!
//! Layers publish values into the request's [`SharedView`] (for example the
//! CSRF field markup); handlers render through [`Templates`], which merges
//! those shared values underneath the handler's own context.

use serde::Serialize;
use std::sync::Arc;
use tera::{Context, Tera, Value};
use thiserror::Error;
use tokio::sync::RwLock;

/// Values published for every template rendered during one request
#[derive(Debug, Clone, Default)]
pub struct SharedView {
    context: Context,
}

impl SharedView {
    /// Create an empty shared view
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a value under `key`, replacing any previous value
    pub fn share<T: Serialize + ?Sized>(&mut self, key: impl Into<String>, value: &T) {
        self.context.insert(key.into(), value);
    }

    /// Look up a shared value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    /// Whether `key` has been shared
    pub fn contains(&self, key: &str) -> bool {
        self.context.contains_key(key)
    }

    /// The underlying template context
    pub fn context(&self) -> &Context {
        &self.context
    }
}

/// Template rendering errors
#[derive(Debug, Error)]
pub enum ViewError {
    /// Template missing or failed to render
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

/// Thread-safe Tera wrapper
#[derive(Clone, Default)]
pub struct Templates {
    inner: Arc<RwLock<Tera>>,
}

impl Templates {
    /// Load templates matching a glob such as `templates/**/*.html`
    pub fn new(glob: &str) -> Result<Self, ViewError> {
        let tera = Tera::new(glob)?;
        Ok(Self {
            inner: Arc::new(RwLock::new(tera)),
        })
    }

    /// Create an engine with no templates
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a template from a string
    pub async fn add_template(&self, name: &str, content: &str) -> Result<(), ViewError> {
        let mut tera = self.inner.write().await;
        tera.add_raw_template(name, content)?;
        Ok(())
    }

    /// Render a template with the given context
    pub async fn render(&self, template: &str, context: &Context) -> Result<String, ViewError> {
        let tera = self.inner.read().await;
        Ok(tera.render(template, context)?)
    }

    /// Render with the request's shared values plus handler data
    ///
    /// Keys in `data` win over shared keys of the same name.
    pub async fn render_shared<T: Serialize>(
        &self,
        template: &str,
        shared: Option<&SharedView>,
        data: &T,
    ) -> Result<String, ViewError> {
        let mut context = shared.map(|s| s.context.clone()).unwrap_or_default();
        context.extend(Context::from_serialize(data)?);
        self.render(template, &context).await
    }
}
