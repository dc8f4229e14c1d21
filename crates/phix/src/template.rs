//! HTML page template for built pages.

use minijinja::{Environment, context};

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ title }}</title>
</head>
<body>
<article class="phix-page">
{{ content|safe }}
</article>
</body>
</html>
"#;

/// Wraps rendered page content in a complete HTML document.
pub(crate) struct PageTemplate {
    env: Environment<'static>,
}

impl PageTemplate {
    pub(crate) fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("page.html", PAGE_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render a page. The title is escaped, the content is inserted as is.
    pub(crate) fn render(&self, title: &str, content: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template("page.html")?
            .render(context! { title, content })
    }
}
