use backoffice_bot_domain::{
    format_day_and_date, german_weekday, zoned, CallbackAction, Document, DocumentKind, ID,
};
use backoffice_bot_infra::{InlineKeyboard, InlineKeyboardButton};
use chrono::{DateTime, Weekday};
use chrono_tz::Tz;

/// Relative reminder offered on every reminder notification
const SNOOZE_HOURS: i64 = 2;

// All chat copy lives here. The workflows only decide which view to
// render; the texts and keyboards are composed in one place so the
// messages stay consistent across transitions.

fn type_line(document: &Document) -> String {
    match document.kind {
        DocumentKind::Payment => format!("💰 <b>Typ:</b> {}", document.category),
        DocumentKind::Task => format!("📋 <b>Typ:</b> {}", document.category),
    }
}

fn date_line(document: &Document) -> String {
    match document.kind {
        DocumentKind::Payment => format!("📅 <b>Datum:</b> {}", document.date_label()),
        DocumentKind::Task => format!("📅 <b>Deadline:</b> {}", document.date_label()),
    }
}

/// The field block shared by every full document view
fn document_facts(document: &Document) -> String {
    format!(
        "📄 <b>Datei:</b> {}\n{}\n🏢 <b>Projekt:</b> {}\n{}\n🔗 <a href=\"{}\">Drive-Link</a>",
        document.display_name(),
        type_line(document),
        document.project_label(),
        date_line(document),
        document.drive_url
    )
}

fn done_button(document: &Document) -> InlineKeyboardButton {
    let label = match document.kind {
        DocumentKind::Payment => "✅ BEZAHLT",
        DocumentKind::Task => "✅ ERLEDIGT",
    };
    InlineKeyboardButton::callback(label, CallbackAction::MarkDone(document.id.clone()).encode())
}

fn undo_button(document: &Document) -> InlineKeyboardButton {
    InlineKeyboardButton::callback("🔄 RÜCKGÄNGIG", CallbackAction::Undo(document.id.clone()).encode())
}

fn reminder_button(document: &Document, label: &str) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(
        label,
        CallbackAction::BeginReminder(document.id.clone()).encode(),
    )
}

fn snooze_button(document: &Document) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(
        "💤 IN 2H ERINNERN",
        CallbackAction::Snooze(document.id.clone(), SNOOZE_HOURS).encode(),
    )
}

fn pending_keyboard(document: &Document) -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![done_button(document), reminder_button(document, "⏰ ERINNERUNG")],
        vec![undo_button(document)],
    ])
}

fn reminder_set_keyboard(document: &Document) -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![done_button(document)],
        vec![
            reminder_button(document, "⏰ NEUE ERINNERUNG"),
            undo_button(document),
        ],
    ])
}

/// The freshly announced document, awaiting action
pub fn pending_view(document: &Document) -> (String, InlineKeyboard) {
    let header = match document.kind {
        DocumentKind::Payment => "📋 <b>Neue Rechnung</b>",
        DocumentKind::Task => "⚡ <b>Neue Action</b>",
    };
    let text = format!(
        "{}\n\n{}\n\n<b>Status:</b> Ausstehend ⏳",
        header,
        document_facts(document)
    );
    (text, pending_keyboard(document))
}

/// The document after it was marked paid/done
pub fn completed_view(document: &Document, tz: Tz) -> (String, InlineKeyboard) {
    let completed_label = document
        .completed_at
        .and_then(|ts| zoned(ts, tz))
        .map(|at| format!("{} um {} Uhr", format_day_and_date(&at), at.format("%H:%M")))
        .unwrap_or_else(|| "-".to_string());

    let (header, when_line, status) = match document.kind {
        DocumentKind::Payment => (
            "✅ <b>RECHNUNG BEZAHLT</b>",
            format!("💶 <b>Bezahlt am:</b> {}", completed_label),
            "<b>Status:</b> Bezahlt ✅",
        ),
        DocumentKind::Task => (
            "✅ <b>ACTION ERLEDIGT</b>",
            format!("🗓 <b>Erledigt am:</b> {}", completed_label),
            "<b>Status:</b> Erledigt ✅",
        ),
    };
    let text = format!(
        "{}\n\n{}\n{}\n\n{}",
        header,
        document_facts(document),
        when_line,
        status
    );
    let keyboard = InlineKeyboard::new(vec![vec![InlineKeyboardButton::callback(
        "🔄 RÜCKGÄNGIG MACHEN",
        CallbackAction::Undo(document.id.clone()).encode(),
    )]]);
    (text, keyboard)
}

/// First reminder step: which weekday?
pub fn day_picker_view(document: &Document) -> (String, InlineKeyboard) {
    let text = format!(
        "📅 <b>Erinnerung setzen</b>\n\n📄 <b>Datei:</b> {}\n\nAn welchem Tag soll erinnert werden?",
        document.display_name()
    );
    let day = |weekday: Weekday, label: &str| {
        InlineKeyboardButton::callback(
            label,
            CallbackAction::ChooseDay(document.id.clone(), weekday).encode(),
        )
    };
    let keyboard = InlineKeyboard::new(vec![
        vec![
            day(Weekday::Mon, "Montag"),
            day(Weekday::Tue, "Dienstag"),
            day(Weekday::Wed, "Mittwoch"),
        ],
        vec![day(Weekday::Thu, "Donnerstag"), day(Weekday::Fri, "Freitag")],
    ]);
    (text, keyboard)
}

/// Second reminder step: which hour on the chosen weekday?
pub fn hour_picker_view(document: &Document, day: Weekday) -> (String, InlineKeyboard) {
    let text = format!(
        "🕐 <b>Uhrzeit wählen</b>\n\n📄 <b>Datei:</b> {}\n📅 <b>Tag:</b> {}\n\nUm welche Uhrzeit?",
        document.display_name(),
        german_weekday(day)
    );
    let hour = |hour: u32, label: &str| {
        InlineKeyboardButton::callback(
            label,
            CallbackAction::ChooseHour(document.id.clone(), day, hour).encode(),
        )
    };
    let keyboard = InlineKeyboard::new(vec![vec![hour(10, "🕙 10:00"), hour(16, "🕓 16:00")]]);
    (text, keyboard)
}

/// Document with an armed absolute reminder
pub fn reminder_armed_view(document: &Document, fire_at: &DateTime<Tz>) -> (String, InlineKeyboard) {
    let text = format!(
        "{}\n⏰ <b>Erinnerung:</b> {} um {} Uhr\n\n<b>Status:</b> Ausstehend mit Erinnerung 🔔",
        document_facts(document),
        format_day_and_date(fire_at),
        fire_at.format("%H:%M")
    );
    (text, reminder_set_keyboard(document))
}

/// Document re-armed relative to now through a snooze button
pub fn snooze_armed_view(document: &Document, hours: i64) -> (String, InlineKeyboard) {
    let text = format!(
        "{}\n⏰ <b>Erinnerung:</b> in {} Stunden\n\n<b>Status:</b> Ausstehend mit Erinnerung 🔔",
        document_facts(document),
        hours
    );
    (text, reminder_set_keyboard(document))
}

/// The original message, rewritten when its reminder fires
pub fn reminder_active_view(document: &Document, sent_at: Option<DateTime<Tz>>) -> (String, InlineKeyboard) {
    let sent_label = sent_at
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let text = format!(
        "⏰ <b>ERINNERUNG AKTIV</b>\n\n{}\n🔔 <b>Erinnerung gesendet um:</b> {}\n\n<b>Status:</b> Ausstehend ⏳",
        document_facts(document),
        sent_label
    );
    let keyboard = InlineKeyboard::new(vec![
        vec![done_button(document)],
        vec![
            reminder_button(document, "⏰ NEUE ERINNERUNG"),
            undo_button(document),
        ],
        vec![snooze_button(document)],
    ]);
    (text, keyboard)
}

/// Fresh notification posted as a reply to the original message when a
/// reminder fires
pub fn reminder_reply_view(document: &Document) -> (String, InlineKeyboard) {
    let (file_line, nag) = match document.kind {
        DocumentKind::Payment => ("📄 <b>Rechnung:</b>", "⚠️ <b>Noch nicht bezahlt!</b>"),
        DocumentKind::Task => ("📄 <b>Action:</b>", "⚠️ <b>Noch nicht erledigt!</b>"),
    };
    let text = format!(
        "🔔 <b>ERINNERUNG</b>\n\n{} {}\n{}\n\n💡 <b>Original-Nachricht siehe oben!</b>",
        file_line,
        document.display_name(),
        nag
    );
    let keyboard = InlineKeyboard::new(vec![vec![done_button(document), snooze_button(document)]]);
    (text, keyboard)
}

/// Standalone notification used when the original message is unknown
/// or can no longer be edited
pub fn reminder_fallback_view(document: &Document) -> (String, InlineKeyboard) {
    let nag = match document.kind {
        DocumentKind::Payment => "⚠️ <b>Noch nicht bezahlt!</b>",
        DocumentKind::Task => "⚠️ <b>Noch nicht erledigt!</b>",
    };
    let text = format!(
        "🔔 <b>ERINNERUNG</b>\n\n{}\n{}",
        document_facts(document),
        nag
    );
    let keyboard = InlineKeyboard::new(vec![
        vec![InlineKeyboardButton::callback(
            "📍 ZUR ORIGINAL-NACHRICHT",
            CallbackAction::JumpToOriginal(document.id.clone()).encode(),
        )],
        vec![done_button(document), snooze_button(document)],
    ]);
    (text, keyboard)
}

/// Deadline warning posted by the automation system via the HTTP API.
/// Not tied to a stored document; all facts come from the request.
#[derive(Debug)]
pub struct DeadlineWarning {
    pub file_name: String,
    pub action_type: String,
    pub project: Option<String>,
    pub deadline: String,
    pub days_until: i64,
}

pub fn deadline_warning_text(warning: &DeadlineWarning) -> String {
    let urgency = match warning.days_until {
        i64::MIN..=0 => "🚨 <b>HEUTE fällig!</b>".to_string(),
        1 => "⚠️ <b>MORGEN fällig!</b>".to_string(),
        days => format!("⏳ <b>Noch {} Tage!</b>", days),
    };
    format!(
        "⏰ <b>DEADLINE-WARNUNG</b>\n\n📄 <b>Action:</b> {}\n📋 <b>Typ:</b> {}\n🏢 <b>Projekt:</b> {}\n📅 <b>Deadline:</b> {}\n\n{}",
        warning.file_name,
        warning.action_type,
        warning.project.as_deref().unwrap_or("Unbekannt"),
        warning.deadline,
        urgency
    )
}

/// Toast shown next to the jump hint button on fallback notifications
pub fn jump_hint(_document_id: &ID) -> &'static str {
    "☝️ Die Original-Nachricht befindet sich weiter oben im Chat"
}

#[cfg(test)]
mod test {
    use super::*;
    use backoffice_bot_domain::NewDocument;
    use chrono::TimeZone;
    use chrono_tz::Europe::Berlin;

    fn payment() -> Document {
        let mut document = Document::new(
            DocumentKind::Payment,
            NewDocument {
                file_name: "invoice_March_Project_Alpha_final_v2.pdf".to_string(),
                category: "Rechnung".to_string(),
                project: Some("Alpha".to_string()),
                date: Some("01.03.2026".to_string()),
                file_id: Some("drive-1".to_string()),
                drive_url: "https://drive.example.com/file/1".to_string(),
            },
            0,
        );
        document.id = ID::new(7);
        document
    }

    #[test]
    fn pending_view_shows_truncated_name_and_action_buttons() {
        let document = payment();
        let (text, keyboard) = pending_view(&document);

        assert!(text.contains("Neue Rechnung"));
        assert!(text.contains("invoice_March_Project_Alpha_fina..."));
        assert!(text.contains("Ausstehend"));

        let tokens: Vec<&str> = keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .map(|b| b.callback_data.as_str())
            .collect();
        assert_eq!(tokens, vec!["p_7", "r_7", "u_7"]);
    }

    #[test]
    fn completed_view_formats_the_completion_time() {
        let mut document = payment();
        let at = Berlin.with_ymd_and_hms(2026, 3, 5, 14, 30, 0).unwrap();
        document.complete(at.timestamp_millis());

        let (text, keyboard) = completed_view(&document, Berlin);
        assert!(text.contains("RECHNUNG BEZAHLT"));
        assert!(text.contains("Donnerstag, 05.03.2026 um 14:30 Uhr"));
        assert_eq!(keyboard.inline_keyboard.len(), 1);
        assert_eq!(keyboard.inline_keyboard[0][0].callback_data, "u_7");
    }

    #[test]
    fn pickers_encode_the_chosen_slot() {
        let document = payment();

        let (_, days) = day_picker_view(&document);
        let day_tokens: Vec<&str> = days
            .inline_keyboard
            .iter()
            .flatten()
            .map(|b| b.callback_data.as_str())
            .collect();
        assert_eq!(day_tokens, vec!["rd_7_1", "rd_7_2", "rd_7_3", "rd_7_4", "rd_7_5"]);

        let (text, hours) = hour_picker_view(&document, Weekday::Thu);
        assert!(text.contains("Donnerstag"));
        let hour_tokens: Vec<&str> = hours
            .inline_keyboard
            .iter()
            .flatten()
            .map(|b| b.callback_data.as_str())
            .collect();
        assert_eq!(hour_tokens, vec!["dt_7_4_10", "dt_7_4_16"]);
    }

    #[test]
    fn reminder_views_always_offer_a_snooze() {
        let document = payment();

        let (_, active) = reminder_active_view(&document, None);
        let (_, reply) = reminder_reply_view(&document);
        let (_, fallback) = reminder_fallback_view(&document);

        for keyboard in [active, reply, fallback] {
            assert!(
                keyboard
                    .inline_keyboard
                    .iter()
                    .flatten()
                    .any(|b| b.callback_data == "s_7_2"),
                "keyboard without snooze button"
            );
        }
    }

    #[test]
    fn deadline_warnings_escalate_with_urgency() {
        let mut warning = DeadlineWarning {
            file_name: "Q1_report.pdf".to_string(),
            action_type: "Freigabe".to_string(),
            project: None,
            deadline: "02.03.2026".to_string(),
            days_until: 5,
        };
        assert!(deadline_warning_text(&warning).contains("Noch 5 Tage"));

        warning.days_until = 1;
        assert!(deadline_warning_text(&warning).contains("MORGEN"));

        warning.days_until = 0;
        assert!(deadline_warning_text(&warning).contains("HEUTE"));
    }
}
