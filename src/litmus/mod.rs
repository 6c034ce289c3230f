//! Litmus rendering-verification client
//!
//! Thin collaborator: derives a test subject, builds the `test_set` XML body
//! and submits it to the account's API with basic auth. The pipeline only
//! hands it final HTML; the report body comes back as text.

use std::collections::HashMap;

use anyhow::{Context, Result};
use kuchiki::traits::TendrilSink;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

use crate::config::LitmusConfig;

pub struct LitmusClient {
    config: LitmusConfig,
    client: reqwest::Client,
    /// Per-invocation duplicate-subject counter: the first use of a subject
    /// is unsuffixed, the nth duplicate gets ` - n`.
    seen_subjects: HashMap<String, u32>,
}

impl LitmusClient {
    #[must_use]
    pub fn new(config: LitmusConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            seen_subjects: HashMap::new(),
        }
    }

    /// Resolve the subject for `html`: explicit config subject, else the
    /// document `<title>` text, else today's date as `YYYY-MM-DD`. Each
    /// candidate is trimmed before being accepted. Duplicates within one
    /// invocation get an incrementing ` - n` suffix.
    pub fn subject_for(&mut self, html: &str) -> String {
        let subject = self.resolve_subject(html);
        let count = self.seen_subjects.entry(subject.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            format!("{subject} - {count}")
        } else {
            subject
        }
    }

    fn resolve_subject(&self, html: &str) -> String {
        if let Some(subject) = &self.config.subject {
            let subject = subject.trim();
            if !subject.is_empty() {
                return subject.to_string();
            }
        }

        let document = kuchiki::parse_html().one(html.to_string());
        if let Ok(title) = document.select_first("title") {
            let title = title.text_contents().trim().to_string();
            if !title.is_empty() {
                return title;
            }
        }

        chrono::Local::now().format("%Y-%m-%d").to_string()
    }

    /// Submit a new test and return the service's response body.
    pub async fn run(&self, html: &str, title: &str) -> Result<String> {
        let body = self.build_test_set(html, title)?;
        let endpoint = format!("{}/tests.xml", self.config.url.trim_end_matches('/'));

        log::info!("Sending new Litmus test: {title}");
        let response = self
            .client
            .post(&endpoint)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Content-Type", "application/xml")
            .body(body)
            .send()
            .await
            .context("Failed to submit Litmus test")?;

        let status = response.status();
        let report = response
            .text()
            .await
            .context("Failed to read Litmus response body")?;

        if !status.is_success() {
            anyhow::bail!("Litmus test submission failed with status {status}");
        }

        log::info!("Litmus test sent");
        Ok(report)
    }

    /// Build the `test_set` XML request body.
    fn build_test_set(&self, html: &str, title: &str) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Start(BytesStart::new("test_set")))?;

        let mut applications = BytesStart::new("applications");
        applications.push_attribute(("type", "array"));
        writer.write_event(Event::Start(applications))?;
        for app in &self.config.applications {
            writer.write_event(Event::Start(BytesStart::new("application")))?;
            writer.write_event(Event::Start(BytesStart::new("code")))?;
            writer.write_event(Event::Text(BytesText::new(app)))?;
            writer.write_event(Event::End(BytesEnd::new("code")))?;
            writer.write_event(Event::End(BytesEnd::new("application")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("applications")))?;

        for (name, value) in [("save_defaults", "false"), ("use_defaults", "false")] {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(value)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }

        writer.write_event(Event::Start(BytesStart::new("email_source")))?;
        writer.write_event(Event::Start(BytesStart::new("body")))?;
        write_cdata(&mut writer, html)?;
        writer.write_event(Event::End(BytesEnd::new("body")))?;
        writer.write_event(Event::Start(BytesStart::new("subject")))?;
        writer.write_event(Event::Text(BytesText::new(title)))?;
        writer.write_event(Event::End(BytesEnd::new("subject")))?;
        writer.write_event(Event::End(BytesEnd::new("email_source")))?;

        writer.write_event(Event::End(BytesEnd::new("test_set")))?;

        String::from_utf8(writer.into_inner()).context("Litmus XML body is not valid UTF-8")
    }
}

/// A CDATA section cannot contain its own `]]>` terminator; split it across
/// adjacent sections so the first ends with `]]` and the next starts with `>`.
fn write_cdata(writer: &mut Writer<Vec<u8>>, value: &str) -> Result<()> {
    let mut rest = value;
    let mut lead = "";
    while let Some(pos) = rest.find("]]>") {
        let section = format!("{lead}{}]]", &rest[..pos]);
        writer.write_event(Event::CData(BytesCData::new(section)))?;
        lead = ">";
        rest = &rest[pos + 3..];
    }
    writer.write_event(Event::CData(BytesCData::new(format!("{lead}{rest}"))))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_at(url: &str, subject: Option<&str>) -> LitmusClient {
        LitmusClient::new(LitmusConfig {
            username: "user".to_string(),
            password: "pass".to_string(),
            url: url.to_string(),
            subject: subject.map(str::to_string),
            applications: vec!["ol2003".to_string(), "gmailnew".to_string()],
        })
    }

    fn client(subject: Option<&str>) -> LitmusClient {
        client_at("https://company.litmus.com", subject)
    }

    #[test]
    fn explicit_subject_wins() {
        let mut litmus = client(Some("  Launch Campaign  "));
        assert_eq!(
            litmus.subject_for("<title>Test Title</title>"),
            "Launch Campaign"
        );
    }

    #[test]
    fn title_is_used_when_no_subject() {
        let mut litmus = client(None);
        assert_eq!(
            litmus.subject_for("<title> Test Title </title>"),
            "Test Title"
        );
    }

    #[test]
    fn date_is_the_last_fallback() {
        let mut litmus = client(None);
        let subject = litmus.subject_for("<title>  </title>");
        let re = regex::Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
        assert!(re.is_match(&subject), "got '{subject}'");
    }

    #[test]
    fn duplicate_subjects_get_an_incrementing_suffix() {
        let mut litmus = client(Some("Weekly"));
        assert_eq!(litmus.subject_for(""), "Weekly");
        assert_eq!(litmus.subject_for(""), "Weekly - 2");
        assert_eq!(litmus.subject_for(""), "Weekly - 3");
    }

    #[test]
    fn test_set_body_carries_html_and_subject() {
        let litmus = client(None);
        let xml = litmus
            .build_test_set("<p>Hello</p>", "Test Title")
            .unwrap();
        assert!(xml.contains("<![CDATA[<p>Hello</p>]]>"));
        assert!(xml.contains("<subject>Test Title</subject>"));
        assert!(xml.contains("<code>ol2003</code>"));
        assert!(xml.contains(r#"<applications type="array">"#));
    }

    #[test]
    fn cdata_terminator_in_the_body_is_split_across_sections() {
        let litmus = client(None);
        let xml = litmus.build_test_set("<p>a]]>b</p>", "T").unwrap();
        assert!(
            xml.contains("<![CDATA[<p>a]]]]><![CDATA[>b</p>]]>"),
            "got: {xml}"
        );
    }

    #[tokio::test]
    async fn run_posts_the_test_set_with_basic_auth() {
        let mut server = mockito::Server::new_async().await;
        let submission = server
            .mock("POST", "/tests.xml")
            // base64("user:pass")
            .match_header("authorization", "Basic dXNlcjpwYXNz")
            .match_header("content-type", "application/xml")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::Regex("<subject>Launch</subject>".to_string()),
                mockito::Matcher::Regex(r"<!\[CDATA\[<p>Hello</p>\]\]>".to_string()),
                mockito::Matcher::Regex("<code>ol2003</code>".to_string()),
            ]))
            .with_status(201)
            .with_body("<test_set><id>42</id></test_set>")
            .create_async()
            .await;

        let litmus = client_at(&server.url(), None);
        let report = litmus.run("<p>Hello</p>", "Launch").await.unwrap();

        submission.assert_async().await;
        assert_eq!(report, "<test_set><id>42</id></test_set>");
    }

    #[tokio::test]
    async fn run_fails_on_an_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _denied = server
            .mock("POST", "/tests.xml")
            .with_status(401)
            .create_async()
            .await;

        let litmus = client_at(&server.url(), None);
        let err = litmus.run("<p></p>", "Launch").await.unwrap_err();
        assert!(err.to_string().contains("401"), "got '{err}'");
    }
}
