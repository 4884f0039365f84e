//! The template converter.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::context::Context;
use crate::convert::args::{Config, ConvertArgs};
use crate::convert::detect::{has_envelope_extension, has_template_marker};
use crate::convert::envelope::parse_template_args;
use crate::convert::format::TemplateFormat;
use crate::convert::ConvertService;
use crate::error::{ConvertError, Result};
use crate::render::{self, JsonnetEngine, ScriptEngine};
use crate::store::{StoreError, Template, TemplateStore};

/// Converts template envelopes into rendered pipeline configuration.
///
/// Returns `Ok(None)` for documents that are not envelopes and for
/// templates whose extension has no renderer, so the caller can fall
/// through to other converters.
#[derive(Clone)]
pub struct TemplateConverter {
    store: Arc<dyn TemplateStore>,
    script: Option<Arc<dyn ScriptEngine>>,
    jsonnet: Option<Arc<dyn JsonnetEngine>>,
    lookup_timeout: Option<Duration>,
}

impl TemplateConverter {
    /// Create a converter with plain substitution only.
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self {
            store,
            script: None,
            jsonnet: None,
            lookup_timeout: None,
        }
    }

    /// Engine for `.star`, `.starlark` and `.script` templates.
    pub fn with_script_engine(mut self, engine: Arc<dyn ScriptEngine>) -> Self {
        self.script = Some(engine);
        self
    }

    /// Engine for `.jsonnet` templates.
    pub fn with_jsonnet_engine(mut self, engine: Arc<dyn JsonnetEngine>) -> Self {
        self.jsonnet = Some(engine);
        self
    }

    /// Upper bound for a single store lookup, on top of the request deadline.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = Some(timeout);
        self
    }

    /// Fetch a template, mapping the store's not-found condition.
    async fn find_template(&self, ctx: &Context, name: &str, namespace: &str) -> Result<Template> {
        let ctx = match self.lookup_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx.clone(),
        };

        match ctx.run(self.store.find_name(&ctx, name, namespace)).await? {
            Ok(template) => Ok(template),
            Err(StoreError::NotFound { .. }) => Err(ConvertError::TemplateNotFound {
                name: name.to_string(),
                namespace: namespace.to_string(),
            }),
            Err(e) => Err(ConvertError::Lookup(e)),
        }
    }
}

#[async_trait]
impl ConvertService for TemplateConverter {
    async fn convert(&self, ctx: &Context, args: &ConvertArgs) -> Result<Option<Config>> {
        if !has_envelope_extension(&args.repo.config) {
            return Ok(None);
        }
        if !has_template_marker(&args.config.data) {
            return Ok(None);
        }

        let template_args = parse_template_args(&args.config.data)?;
        debug!(
            namespace = %args.repo.namespace,
            load = %template_args.load,
            "resolving template envelope"
        );

        let template = self
            .find_template(ctx, &template_args.load, &args.repo.namespace)
            .await?;

        let Some(format) = TemplateFormat::for_template_name(&template.name) else {
            debug!(name = %template.name, "unsupported template type, passing through");
            return Ok(None);
        };

        let data = match format {
            TemplateFormat::Yaml => render::render_yaml(&template, &template_args.data)?,
            TemplateFormat::Starlark => {
                render::render_script(
                    ctx,
                    self.script.as_deref(),
                    args,
                    &template,
                    &template_args.data,
                )
                .await?
            }
            TemplateFormat::Jsonnet => {
                render::render_jsonnet(
                    ctx,
                    self.jsonnet.as_deref(),
                    args,
                    &template,
                    &template_args.data,
                )
                .await?
            }
        };

        info!(
            namespace = %args.repo.namespace,
            template = %template.name,
            %format,
            "rendered template"
        );
        Ok(Some(Config { data }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RenderError, TemplateData};
    use crate::store::MemoryStore;

    const ENVELOPE: &str = "kind: template\nload: greet.yml\ndata:\n  name: World\n";

    fn converter(templates: Vec<Template>) -> TemplateConverter {
        TemplateConverter::new(Arc::new(MemoryStore::with_templates(templates)))
    }

    fn args(filename: &str, data: &str) -> ConvertArgs {
        ConvertArgs::new("octocat", filename, data)
    }

    struct FailingStore;

    #[async_trait]
    impl TemplateStore for FailingStore {
        async fn find_name(
            &self,
            _ctx: &Context,
            _name: &str,
            _namespace: &str,
        ) -> std::result::Result<Template, StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("connection refused")))
        }

        async fn list(
            &self,
            _ctx: &Context,
            _namespace: &str,
        ) -> std::result::Result<Vec<Template>, StoreError> {
            Ok(Vec::new())
        }
    }

    struct HangingStore;

    #[async_trait]
    impl TemplateStore for HangingStore {
        async fn find_name(
            &self,
            _ctx: &Context,
            _name: &str,
            _namespace: &str,
        ) -> std::result::Result<Template, StoreError> {
            std::future::pending().await
        }

        async fn list(
            &self,
            _ctx: &Context,
            _namespace: &str,
        ) -> std::result::Result<Vec<Template>, StoreError> {
            std::future::pending().await
        }
    }

    struct Upper;

    #[async_trait]
    impl ScriptEngine for Upper {
        async fn render(
            &self,
            _ctx: &Context,
            _args: &ConvertArgs,
            template: &Template,
            _data: &TemplateData,
        ) -> anyhow::Result<String> {
            Ok(template.data.to_uppercase())
        }
    }

    #[async_trait]
    impl JsonnetEngine for Upper {
        async fn render(
            &self,
            _ctx: &Context,
            _args: &ConvertArgs,
            template: &Template,
            _data: &TemplateData,
        ) -> anyhow::Result<String> {
            Ok(format!("jsonnet:{}", template.data))
        }
    }

    #[tokio::test]
    async fn non_yml_filename_passes_through() {
        let conv = converter(vec![Template::new("octocat", "greet.yml", "x")]);
        for filename in [".drone.yaml", ".drone.star", ".drone.jsonnet", "drone"] {
            let out = conv
                .convert(&Context::background(), &args(filename, ENVELOPE))
                .await
                .unwrap();
            assert!(out.is_none(), "{filename} should pass through");
        }
    }

    #[tokio::test]
    async fn missing_marker_passes_through() {
        let conv = converter(vec![]);
        let out = conv
            .convert(
                &Context::background(),
                &args(".drone.yml", "kind: pipeline\nname: default\n"),
            )
            .await
            .unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn invalid_yaml_is_syntax_error() {
        let conv = converter(vec![]);
        let err = conv
            .convert(
                &Context::background(),
                &args(".drone.yml", "kind: template\nload: [oops\n"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::TemplateSyntax { .. }));
    }

    #[tokio::test]
    async fn missing_template_is_not_found() {
        let conv = converter(vec![]);
        let err = conv
            .convert(&Context::background(), &args(".drone.yml", ENVELOPE))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::TemplateNotFound { .. }));
    }

    #[tokio::test]
    async fn template_in_other_namespace_is_not_found() {
        let conv = converter(vec![Template::new("spaceghost", "greet.yml", "hi {{ name }}")]);
        let err = conv
            .convert(&Context::background(), &args(".drone.yml", ENVELOPE))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::TemplateNotFound { .. }));
    }

    #[tokio::test]
    async fn store_failure_is_opaque_lookup_error() {
        let conv = TemplateConverter::new(Arc::new(FailingStore));
        let err = conv
            .convert(&Context::background(), &args(".drone.yml", ENVELOPE))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Lookup(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn renders_yaml_template() {
        let conv = converter(vec![Template::new(
            "octocat",
            "greet.yml",
            "kind: pipeline\nsteps:\n- commands: [echo hello {{ name }}]\n",
        )]);
        let out = conv
            .convert(&Context::background(), &args(".drone.yml", ENVELOPE))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            out.data,
            "kind: pipeline\nsteps:\n- commands: [echo hello World]\n"
        );
    }

    #[tokio::test]
    async fn unsupported_extension_passes_through() {
        let conv = converter(vec![Template::new("octocat", "greet.txt", "hello")]);
        let out = conv
            .convert(
                &Context::background(),
                &args(".drone.yml", "kind: template\nload: greet.txt\n"),
            )
            .await
            .unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn yaml_compile_failure_is_render_error() {
        let conv = converter(vec![Template::new("octocat", "greet.yml", "{% for %}")]);
        let err = conv
            .convert(&Context::background(), &args(".drone.yml", ENVELOPE))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Render(RenderError::Compile { .. })));
    }

    #[tokio::test]
    async fn dispatches_script_extensions_to_script_engine() {
        for name in ["plugin.star", "plugin.starlark", "plugin.script"] {
            let conv = converter(vec![Template::new("octocat", name, "def main(): pass")])
                .with_script_engine(Arc::new(Upper));
            let envelope = format!("kind: template\nload: {name}\n");
            let out = conv
                .convert(&Context::background(), &args(".drone.yml", &envelope))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(out.data, "DEF MAIN(): PASS");
        }
    }

    #[tokio::test]
    async fn dispatches_jsonnet_to_jsonnet_engine() {
        let conv = converter(vec![Template::new("octocat", "plugin.jsonnet", "{}")])
            .with_jsonnet_engine(Arc::new(Upper));
        let out = conv
            .convert(
                &Context::background(),
                &args(".drone.yml", "kind: template\nload: plugin.jsonnet\n"),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(out.data, "jsonnet:{}");
    }

    #[tokio::test]
    async fn unconfigured_engine_is_render_error() {
        let conv = converter(vec![Template::new("octocat", "plugin.jsonnet", "{}")]);
        let err = conv
            .convert(
                &Context::background(),
                &args(".drone.yml", "kind: template\nload: plugin.jsonnet\n"),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Render(RenderError::EngineUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn cancelled_context_aborts_lookup() {
        let conv = TemplateConverter::new(Arc::new(HangingStore));
        let ctx = Context::background();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let err = conv
            .convert(&ctx, &args(".drone.yml", ENVELOPE))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Cancelled));
    }

    #[tokio::test]
    async fn lookup_timeout_bounds_store_call() {
        let conv = TemplateConverter::new(Arc::new(HangingStore))
            .with_lookup_timeout(Duration::from_millis(20));
        let err = conv
            .convert(&Context::background(), &args(".drone.yml", ENVELOPE))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn conversion_is_idempotent() {
        let conv = converter(vec![Template::new("octocat", "greet.yml", "hello {{ name }}\n")]);
        let input = args(".drone.yml", ENVELOPE);
        let first = conv.convert(&Context::background(), &input).await.unwrap();
        let second = conv.convert(&Context::background(), &input).await.unwrap();
        assert_eq!(first, second);
    }
}
