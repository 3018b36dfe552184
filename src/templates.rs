use std::sync::Arc;

use anyhow::{Context, Result};
use minijinja::{path_loader, AutoEscape, Environment};
use minijinja_autoreload::AutoReloader;

pub type Templates = Arc<AutoReloader>;

pub fn create(template_path: impl Into<String>) -> Templates {
    let template_path = template_path.into();
    Arc::new(AutoReloader::new(move |notifier| {
        let mut env = Environment::new();
        let template_path = template_path.as_str();
        notifier.watch_path(template_path, true);
        env.set_loader(path_loader(template_path));
        // SVG is XML; minijinja's default callback only covers .html/.htm/.xml
        env.set_auto_escape_callback(|name| {
            if name.ends_with(".svg") || name.ends_with(".xml") || name.ends_with(".html") {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        Ok(env)
    }))
}

pub fn render<S>(templates: &Templates, template_name: &str, context: S) -> Result<String>
where S: serde::Serialize {
    let env = templates.acquire_env().context("Failed to get template environment")?;
    let template = env.get_template(template_name).context("Failed to get template")?;
    template.render(context).context("Failed to render template")
}
