use gatherly_domain::NotificationKind;

pub struct NotificationTemplate {
    pub subject: &'static str,
    pub html_body: &'static str,
}

const CONFIRMATION: NotificationTemplate = NotificationTemplate {
    subject: "You are registered for {{{title}}}",
    html_body: r#"<p>Hi {{name}},</p>
<p>You are now registered for <strong>{{title}}</strong>, starting {{start}}.</p>
<p>We will send you a reminder the day before the event.</p>"#,
};

const REMINDER: NotificationTemplate = NotificationTemplate {
    subject: "Reminder: {{{title}}} starts tomorrow",
    html_body: r#"<p>Hi {{name}},</p>
<p>This is a reminder that <strong>{{title}}</strong> starts tomorrow, {{start}}.</p>
<p>See you there!</p>"#,
};

pub fn template_for(kind: NotificationKind) -> &'static NotificationTemplate {
    match kind {
        NotificationKind::Confirmation => &CONFIRMATION,
        NotificationKind::Reminder => &REMINDER,
    }
}
