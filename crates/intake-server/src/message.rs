//! Mail bodies for stored submissions.

use intake_store::repo::{RecruitmentRecord, RegistrationRecord};

const CLUB_NAME: &str = "Cloud Community Club";
const MEMBERSHIP_YEAR: &str = "2026";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub html: String,
    pub text: String,
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Membership welcome with a pass showing roll number and department.
pub fn render_welcome(record: &RegistrationRecord) -> RenderedMessage {
    let fields = &record.fields;
    let name = escape_html(&fields.name);
    let roll_number = escape_html(&fields.roll_number.to_uppercase());
    let department = escape_html(&fields.department);

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta http-equiv="Content-Type" content="text/html; charset=UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>Welcome to C3</title>
</head>
<body style="margin: 0; padding: 0; background-color: #f4f4f7; font-family: Helvetica, Arial, sans-serif;">
  <table width="100%" border="0" cellpadding="0" cellspacing="0" role="presentation">
    <tr>
      <td align="center" style="padding: 40px 0;">
        <table width="600" border="0" cellpadding="0" cellspacing="0" style="max-width: 600px; background-color: #ffffff; border-radius: 12px;">
          <tr>
            <td align="center" style="padding: 40px 40px 20px 40px;">
              <h1 style="margin: 0; font-size: 24px; color: #111827;">{club}</h1>
            </td>
          </tr>
          <tr>
            <td align="center" style="padding: 0 40px 30px 40px; color: #6b7280; font-size: 16px;">
              <p style="margin: 0;">Welcome aboard, <strong style="color: #111827;">{name}</strong>!</p>
              <p style="margin: 10px 0 0 0;">Your application has been accepted. You are now an official member of C³.</p>
            </td>
          </tr>
          <tr>
            <td style="padding: 0 40px 40px 40px;">
              <table width="100%" border="0" cellpadding="0" cellspacing="0" style="background: #4F46E5; border-radius: 16px; color: #ffffff;">
                <tr>
                  <td style="padding: 30px;">
                    <div style="font-size: 11px; text-transform: uppercase; letter-spacing: 1px;">Membership Pass {year}</div>
                    <div style="margin-top: 20px; font-size: 22px; font-weight: bold;">{name}</div>
                    <table width="100%" border="0" cellpadding="0" cellspacing="0" style="margin-top: 15px; color: #ffffff;">
                      <tr>
                        <td width="50%" valign="top">
                          <div style="font-size: 10px; text-transform: uppercase;">Student ID</div>
                          <div style="font-size: 14px; font-weight: 600;">{roll_number}</div>
                        </td>
                        <td valign="top">
                          <div style="font-size: 10px; text-transform: uppercase;">Department</div>
                          <div style="font-size: 14px; font-weight: 600;">{department}</div>
                        </td>
                      </tr>
                    </table>
                  </td>
                </tr>
              </table>
            </td>
          </tr>
          <tr>
            <td style="padding: 0 40px 40px 40px; color: #374151; font-size: 15px;">
              <h3 style="margin: 0 0 20px 0; font-size: 14px; text-transform: uppercase; color: #9CA3AF;">Your Next Steps</h3>
              <p style="margin: 0 0 15px 0;"><strong>Subscribed to Newsletter</strong><br>You'll get updates on workshops &amp; tech talks.</p>
              <p style="margin: 0;"><strong>Wait for Hackathons</strong><br>We will notify you when registration opens.</p>
            </td>
          </tr>
          <tr>
            <td align="center" style="padding: 30px; background-color: #f9fafb; color: #9CA3AF; font-size: 12px;">
              &copy; {year} {club} (C³).
            </td>
          </tr>
        </table>
      </td>
    </tr>
  </table>
</body>
</html>
"#,
        club = CLUB_NAME,
        year = MEMBERSHIP_YEAR,
    );

    let text = format!(
        "Welcome aboard, {name}!\n\n\
         Your application has been accepted. You are now an official member of C³.\n\n\
         Membership Pass {year}\n\
         Student ID: {roll_number}\n\
         Department: {department}\n\n\
         Your next steps:\n\
         - Subscribed to Newsletter: you'll get updates on workshops & tech talks.\n\
         - Wait for Hackathons: we will notify you when registration opens.\n",
        name = fields.name,
        year = MEMBERSHIP_YEAR,
        roll_number = fields.roll_number.to_uppercase(),
        department = fields.department,
    );

    RenderedMessage { html, text }
}

pub fn render_recruitment_unlocked(record: &RecruitmentRecord) -> RenderedMessage {
    let name = escape_html(&record.fields.name);
    let html = format!(
        "<!DOCTYPE html>\n<html>\n<body style=\"font-family: Helvetica, Arial, sans-serif; color: #374151;\">\n\
         <h1 style=\"font-size: 22px; color: #111827;\">{club}</h1>\n\
         <p>Hi <strong>{name}</strong>, your recruitment challenges are now unlocked.</p>\n\
         <p>Head back to the recruitment page to get started.</p>\n\
         </body>\n</html>\n",
        club = CLUB_NAME,
    );
    let text = format!(
        "Hi {name}, your recruitment challenges are now unlocked.\n\
         Head back to the recruitment page to get started.\n",
        name = record.fields.name,
    );
    RenderedMessage { html, text }
}
