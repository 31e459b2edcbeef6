//! Template rendering for templatedir.
//! The extraction engine only talks to the [`TemplateRenderer`] trait; the
//! bundled implementation is backed by MiniJinja.
use std::io::Write;

use cruet::Inflector;
use minijinja::{Environment, UndefinedBehavior, Value};

use crate::error::{Error, Result};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Parses a template body.
    ///
    /// # Arguments
    /// * `name` - Name used in diagnostics, usually the template's relative path
    /// * `source` - Template body
    ///
    /// # Errors
    /// * `Error::TemplateSyntax` if the body does not parse
    fn compile(&self, name: &str, source: &str) -> Result<Box<dyn CompiledTemplate>>;

    /// Renders a template string with the given context.
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        let compiled = self.compile("inline", template)?;
        let mut out = Vec::new();
        compiled.render_to(context, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

/// A parsed template, ready to be rendered any number of times.
pub trait CompiledTemplate {
    /// Streams the rendered output into `out`.
    ///
    /// # Errors
    /// * `Error::TemplateRender` if evaluation fails; `out` keeps whatever was
    ///   written before the failure
    fn render_to(&self, context: &Value, out: &mut dyn Write) -> Result<()>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer that fails on undefined values.
    pub fn new() -> Self {
        Self::with_undefined_behavior(UndefinedBehavior::Strict)
    }

    /// Creates a renderer that renders undefined values as empty strings.
    pub fn lenient() -> Self {
        Self::with_undefined_behavior(UndefinedBehavior::Lenient)
    }

    fn with_undefined_behavior(behavior: UndefinedBehavior) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(behavior);
        env.set_keep_trailing_newline(true);
        add_case_filters(&mut env);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

fn add_case_filters(env: &mut Environment<'static>) {
    env.add_filter("snake_case", |value: String| value.to_snake_case());
    env.add_filter("camel_case", |value: String| value.to_camel_case());
    env.add_filter("pascal_case", |value: String| value.to_pascal_case());
    env.add_filter("kebab_case", |value: String| value.to_kebab_case());
    env.add_filter("screaming_snake_case", |value: String| value.to_screaming_snake_case());
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn compile(&self, name: &str, source: &str) -> Result<Box<dyn CompiledTemplate>> {
        let mut env = self.env.clone();
        env.add_template_owned(name.to_string(), source.to_string())
            .map_err(|source| Error::TemplateSyntax { template: name.into(), source })?;
        Ok(Box::new(MiniJinjaTemplate { env, name: name.to_string() }))
    }
}

/// A template registered in its own copy of the environment.
struct MiniJinjaTemplate {
    env: Environment<'static>,
    name: String,
}

impl CompiledTemplate for MiniJinjaTemplate {
    fn render_to(&self, context: &Value, out: &mut dyn Write) -> Result<()> {
        let render_error =
            |source| Error::TemplateRender { template: self.name.clone().into(), source };
        let template = self.env.get_template(&self.name).map_err(render_error)?;
        template.render_to_write(context, out).map_err(render_error)?;
        Ok(())
    }
}
