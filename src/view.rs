//! HTML view for the form/result page.
//!
//! One page serves every state: the empty landing form, a successful render
//! with the staged image inlined, and error states with the submitted values
//! echoed back. All interpolated values are HTML-escaped.

use crate::renderer::RenderParams;

/// View model for the single page this service renders
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub azimuth_deg: String,
    pub polar_deg: String,
    pub elevation_deg: String,
    pub image_url: Option<String>,
    pub error: Option<String>,
}

impl Page {
    /// The landing page: empty form with suggested default angles.
    pub fn defaults() -> Self {
        Self {
            azimuth_deg: "45.0".to_string(),
            polar_deg: "60.0".to_string(),
            elevation_deg: "30.0".to_string(),
            image_url: None,
            error: None,
        }
    }

    /// A page echoing parsed angles back in canonical float form.
    pub fn echoing(params: RenderParams) -> Self {
        Self {
            azimuth_deg: params.azimuth_deg.to_string(),
            polar_deg: params.polar_deg.to_string(),
            elevation_deg: params.elevation_deg.to_string(),
            image_url: None,
            error: None,
        }
    }

    /// A page echoing the raw, unparsed form values.
    pub fn echoing_raw(azimuth: &str, polar: &str, elevation: &str) -> Self {
        Self {
            azimuth_deg: azimuth.to_string(),
            polar_deg: polar.to_string(),
            elevation_deg: elevation.to_string(),
            image_url: None,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Render the page to an HTML document.
    pub fn render(&self) -> String {
        let mut body = String::new();

        body.push_str("<h1>Render viewer</h1>\n");
        body.push_str("<form method=\"post\" action=\"/render\">\n");
        body.push_str(&field("Azimuth (deg)", "azimuth_deg", &self.azimuth_deg));
        body.push_str(&field("Polar (deg)", "polar_deg", &self.polar_deg));
        body.push_str(&field("Elevation (deg)", "elevation_deg", &self.elevation_deg));
        body.push_str("<button type=\"submit\">Render</button>\n</form>\n");

        if let Some(error) = &self.error {
            body.push_str(&format!("<p class=\"error\">{}</p>\n", escape(error)));
        }

        if let Some(url) = &self.image_url {
            body.push_str(&format!(
                "<img src=\"{}\" alt=\"rendered view\">\n",
                escape(url)
            ));
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Render viewer</title>\n</head>\n<body>\n{body}</body>\n</html>\n"
        )
    }
}

fn field(label: &str, name: &str, value: &str) -> String {
    format!(
        "<label>{label} <input type=\"text\" name=\"{name}\" value=\"{}\"></label>\n",
        escape(value)
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
