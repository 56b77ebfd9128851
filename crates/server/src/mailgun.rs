use shared_types::Case;

// --- Environment helpers ---

fn mailgun_api_key() -> Result<String, String> {
    std::env::var("MAILGUN_API_KEY").map_err(|_| "MAILGUN_API_KEY is not configured".to_string())
}

fn mailgun_domain() -> Result<String, String> {
    std::env::var("MAILGUN_DOMAIN").map_err(|_| "MAILGUN_DOMAIN is not configured".to_string())
}

fn mailgun_from() -> Result<String, String> {
    match std::env::var("MAILGUN_FROM") {
        Ok(v) => Ok(v),
        Err(_) => Ok(format!("{} <noreply@{}>", app_name(), mailgun_domain()?)),
    }
}

fn app_name() -> String {
    std::env::var("APP_NAME").unwrap_or_else(|_| "Nyaya".to_string())
}

// --- Core email sending ---

#[tracing::instrument(skip(html_body))]
pub async fn send_email(to: &str, subject: &str, html_body: &str) -> Result<(), String> {
    let domain = mailgun_domain()?;
    let url = format!("https://api.mailgun.net/v3/{}/messages", domain);

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .basic_auth("api", Some(mailgun_api_key()?))
        .form(&[
            ("from", mailgun_from()?),
            ("to", to.to_string()),
            ("subject", subject.to_string()),
            ("html", html_body.to_string()),
        ])
        .send()
        .await
        .map_err(|e| format!("Mailgun request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Mailgun API error ({}): {}", status, body));
    }

    tracing::info!(to = to, subject = subject, "Email sent successfully");
    Ok(())
}

// --- Higher-level helpers ---

/// Email one party about a case approval or rejection. Delivery is
/// best-effort: errors are logged, never returned.
pub async fn send_case_status_email(to: &str, case: &Case, approved: bool) {
    let (subject, html) = if approved {
        (
            format!("Case approved: {}", case.title),
            templates::case_approved_html(case, &app_name()),
        )
    } else {
        (
            format!("Case rejected: {}", case.title),
            templates::case_rejected_html(case, &app_name()),
        )
    };
    if let Err(e) = send_email(to, &subject, &html).await {
        tracing::error!(error = %e, to = to, "Failed to send case status email");
    }
}

mod templates {
    use shared_types::Case;

    pub fn case_approved_html(case: &Case, app: &str) -> String {
        let pnr = case.pnr.as_deref().unwrap_or("(unassigned)");
        let hearing = case
            .hearing_date
            .map(|d| d.format("%d %b %Y %H:%M UTC").to_string())
            .unwrap_or_else(|| "(not scheduled)".to_string());
        format!(
            "<h2>Case approved</h2>\
             <p>The case <strong>{}</strong> has been approved by the police station.</p>\
             <p>PNR: <strong>{}</strong><br>Hearing: {}</p>\
             <p>— {}</p>",
            case.title, pnr, hearing, app,
        )
    }

    pub fn case_rejected_html(case: &Case, app: &str) -> String {
        format!(
            "<h2>Case rejected</h2>\
             <p>The case <strong>{}</strong> was rejected by the police station. \
             Sign in to review the details.</p>\
             <p>— {}</p>",
            case.title, app,
        )
    }
}
