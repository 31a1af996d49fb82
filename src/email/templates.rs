use askama::Template;

/// Everything an inquiry notification shows, already resolved from the submission.
pub struct InquiryView<'a> {
    pub site_name: &'a str,
    pub inquiry_type: Option<&'a str>,
    pub name: &'a str,
    pub email: &'a str,
    pub project_details: &'a str,
    pub extras: &'a [(String, String)],
    pub received_at: String,
}

#[derive(Template)]
#[template(path = "email/inquiry.html")]
struct InquiryHtmlTemplate<'a> {
    site_name: &'a str,
    inquiry_type: Option<&'a str>,
    name: &'a str,
    email: &'a str,
    project_details: &'a str,
    extras: &'a [(String, String)],
    received_at: &'a str,
}

pub fn render_inquiry_text(view: &InquiryView<'_>) -> String {
    let mut out = String::from("New inquiry received:\n\n");

    if let Some(kind) = view.inquiry_type {
        out.push_str(&format!("Type: {kind}\n"));
    }
    out.push_str(&format!("Name: {}\nEmail: {}\n", view.name, view.email));
    for (key, value) in view.extras {
        out.push_str(&format!("{key}: {value}\n"));
    }

    out.push_str(&format!(
        "\nProject Details:\n{}\n\n---\nReceived: {}\nSent from {}",
        view.project_details, view.received_at, view.site_name
    ));

    out
}

/// HTML alternative. Submitted values are escaped by the template engine.
pub fn render_inquiry_html(view: &InquiryView<'_>) -> Result<String, askama::Error> {
    InquiryHtmlTemplate {
        site_name: view.site_name,
        inquiry_type: view.inquiry_type,
        name: view.name,
        email: view.email,
        project_details: view.project_details,
        extras: view.extras,
        received_at: &view.received_at,
    }
    .render()
}
