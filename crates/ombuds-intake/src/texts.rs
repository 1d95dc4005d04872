// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed Uzbek prompt set and message formatters.
//!
//! All user-visible wording lives here so the controller logic stays free of
//! literal strings.

use chrono::DateTime;

use ombuds_core::{DirectoryEntry, SubmissionRecord};

pub const WELCOME: &str =
    "Assalomu alaykum! Siz bu bot orqali anonim tarzda murojaat yuborishingiz mumkin";

pub const HELP: &str = "Bu bot orqali anonim murojaat yuborishingiz mumkin.\n\n\
1. /start komandasini bosing\n\
2. Toifalardan birini tanlang\n\
3. Vaziyatni to'liq tavsiflang\n\
4. Xabar adminga yuboriladi\n\n\
Xabar yuborishda xato bo'lsa, xatolik haqida xabar beriladi.";

pub const ENTER_PASSWORD: &str = "Parolni kiriting:";
pub const WRONG_PASSWORD: &str = "Noto'g'ri parol. Qaytadan urinib ko'ring.";
pub const NOT_ADMIN: &str = "Siz admin emassiz.";

pub const ADMIN_MENU: &str = "Admin menyusi:\n\
1. /show - Foydalanuvchilar yuborgan xabarlarni ko'rish\n\
2. /clear - Barcha xabarlarni tozalash\n\
3. /send - Foydalanuvchiga xabar yuborish";

pub const ENTER_NAME: &str = "Ismi familyangizni kiriting:";
pub const ENTER_CONTACT: &str = "Telefon raqamingizni kiriting yoki pastdan tugmasini bosing:";
pub const SHARE_CONTACT_LABEL: &str = "📞 Kontaktni ulashish";
pub const ENTER_MESSAGE: &str =
    "Endi vaziyatni to'liq yozib bering. Sizning shaxsingiz sir saqlanadi.";
pub const CONFIRM_SECRET: &str = "Xabaringiz sir saqlansinmi?";
pub const SECRET_YES_LABEL: &str = "✅ Ha, sir saqlansin";
pub const SECRET_NO_LABEL: &str = "❌ Yo'q, oshkor qilinsin";

pub const SUBMIT_SUCCESS: &str =
    "Xabar muvaffaqiyatli yuborildi!✅ biz bu muammoni 1 hafta ichida hal qilamiz.";
pub const SUBMIT_FAILURE: &str = "Uzr, xabarni yuborishda xatolik yuz berdi.";

pub const NO_SUBMISSIONS: &str = "Hozirda hech qanday xabar yuborilmagan.";
pub const NO_COMPLETE_SUBMISSIONS: &str = "Hozirda hech qanday to'liq xabar yuborilmagan.";
pub const CLEARED: &str = "Barcha xabarlar tozalandi.";
pub const NO_USERS: &str = "Hozirda hech qanday foydalanuvchi topilmadi.";
pub const EMPTY_DIRECTORY: &str = "Hech qanday foydalanuvchi topilmadi.";
pub const SELECT_USER_PROMPT: &str = "Foydalanuvchi raqamini kiriting (masalan: 1, 2, 3):";

pub const PLEASE_START: &str = "Iltimos, /start komandasini bosing va toifani tanlang.";

/// Placeholder shown for missing directory fields.
pub const UNKNOWN: &str = "Noma'lum";

const SECRET_YES_WORD: &str = "Ha";
const SECRET_NO_WORD: &str = "Yo'q";

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

pub fn invalid_user_number(max: usize) -> String {
    format!("Noto'g'ri raqam. Iltimos, 1 dan {max} gacha raqam kiriting.")
}

pub fn user_selected(name: &str) -> String {
    format!("Tanlangan foydalanuvchi: {name}\n\nYubormoqchi bo'lgan xabaringizni yozing:")
}

pub fn admin_send_success(name: &str, chat_id: i64) -> String {
    format!("✅ Xabar muvaffaqiyatli yuborildi!\n\nFoydalanuvchi: {name}\nChat ID: {chat_id}")
}

pub fn admin_send_failure(detail: &str) -> String {
    format!("❌ Xabarni yuborishda xatolik yuz berdi.\n\nXatolik: {detail}")
}

/// Render an RFC 3339 timestamp in the display pattern, falling back to the
/// raw string when it does not parse.
fn format_timestamp(ts: &str) -> String {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|_| ts.to_string())
}

/// The notification relayed to the admin chat after a completed submission.
/// Field order is fixed.
pub fn format_admin_notification(record: &SubmissionRecord) -> String {
    let secret = match record.is_secret {
        Some(true) => SECRET_YES_WORD,
        _ => SECRET_NO_WORD,
    };
    format!(
        "Toifa: {}\nIsmi: {}\nTelefon: {}\nVaziyat: {}\nSir saqlansinmi: {}\nSana vaqt: {}\nChat ID: {}",
        record.category.as_deref().unwrap_or_default(),
        record.name.as_deref().unwrap_or_default(),
        record.contact.as_deref().unwrap_or_default(),
        record.message.as_deref().unwrap_or_default(),
        secret,
        record
            .submitted_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_default(),
        record.user_id,
    )
}

/// The numbered `/show` listing. Only present fields get a line.
pub fn format_report_list(records: &[&SubmissionRecord]) -> String {
    let mut out = String::from("Yuborilgan to'liq xabarlarni ro'yxati:\n\n");
    for (index, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "{}. Toifa: {}\n",
            index + 1,
            record.category.as_deref().unwrap_or_default()
        ));
        if let Some(name) = &record.name {
            out.push_str(&format!("   Ismi: {name}\n"));
        }
        if let Some(username) = &record.username {
            out.push_str(&format!("   Username: @{username}\n"));
        }
        if let Some(contact) = &record.contact {
            out.push_str(&format!("   Telefon: {contact}\n"));
        }
        if let Some(message) = &record.message {
            out.push_str(&format!("   Vaziyat: {message}\n"));
        }
        if let Some(is_secret) = record.is_secret {
            let word = if is_secret {
                SECRET_YES_WORD
            } else {
                SECRET_NO_WORD
            };
            out.push_str(&format!("   Sir saqlansinmi: {word}\n"));
        }
        if let Some(ts) = &record.submitted_at {
            out.push_str(&format!("   Sana vaqt: {}\n", format_timestamp(ts)));
        }
        out.push_str(&format!("   Chat ID: {}\n", record.user_id));
        out.push('\n');
    }
    out
}

/// The numbered `/send` recipient directory, ending with the selection prompt.
pub fn format_directory(entries: &[DirectoryEntry]) -> String {
    let mut out = String::from("Foydalanuvchilar ro'yxati:\n\n");
    for (index, entry) in entries.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, entry.name));
        out.push_str(&format!("   Chat ID: {}\n", entry.user_id));
        out.push_str(&format!("   Telefon: {}\n", entry.contact));
        out.push_str(&format!("   So'nggi toifa: {}\n\n", entry.last_category));
    }
    out.push_str(SELECT_USER_PROMPT);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> SubmissionRecord {
        SubmissionRecord {
            category: Some("Korrupsiya".into()),
            name: Some("Ali Valiyev".into()),
            contact: Some("+998901234567".into()),
            message: Some("Pora so'raldi".into()),
            is_secret: Some(true),
            submitted_at: Some("2026-03-15T08:30:00+00:00".into()),
            user_id: 42,
            username: Some("ali".into()),
        }
    }

    #[test]
    fn admin_notification_has_fixed_field_order() {
        let text = format_admin_notification(&sample_record());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Toifa: Korrupsiya");
        assert_eq!(lines[1], "Ismi: Ali Valiyev");
        assert_eq!(lines[2], "Telefon: +998901234567");
        assert_eq!(lines[3], "Vaziyat: Pora so'raldi");
        assert_eq!(lines[4], "Sir saqlansinmi: Ha");
        assert_eq!(lines[5], "Sana vaqt: 15.03.2026 08:30:00");
        assert_eq!(lines[6], "Chat ID: 42");
    }

    #[test]
    fn admin_notification_public_submission_says_no() {
        let mut record = sample_record();
        record.is_secret = Some(false);
        let text = format_admin_notification(&record);
        assert!(text.contains("Sir saqlansinmi: Yo'q"));
    }

    #[test]
    fn report_list_skips_missing_fields() {
        let mut record = sample_record();
        record.username = None;
        record.contact = None;
        let records = vec![&record];
        let text = format_report_list(&records);
        assert!(text.starts_with("Yuborilgan to'liq xabarlarni ro'yxati:"));
        assert!(text.contains("1. Toifa: Korrupsiya"));
        assert!(text.contains("Ismi: Ali Valiyev"));
        assert!(!text.contains("Username:"));
        assert!(!text.contains("Telefon:"));
        assert!(text.contains("Chat ID: 42"));
    }

    #[test]
    fn unparseable_timestamp_is_shown_raw() {
        let mut record = sample_record();
        record.submitted_at = Some("not-a-date".into());
        let text = format_admin_notification(&record);
        assert!(text.contains("Sana vaqt: not-a-date"));
    }

    #[test]
    fn directory_ends_with_selection_prompt() {
        let entries = vec![DirectoryEntry {
            user_id: 42,
            name: "Vali".into(),
            contact: "+998901234567".into(),
            last_category: "Diniy".into(),
            last_seen: None,
        }];
        let text = format_directory(&entries);
        assert!(text.starts_with("Foydalanuvchilar ro'yxati:"));
        assert!(text.contains("1. Vali"));
        assert!(text.contains("So'nggi toifa: Diniy"));
        assert!(text.ends_with(SELECT_USER_PROMPT));
    }
}
