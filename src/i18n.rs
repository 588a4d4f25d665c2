//! Interface locales
//!
//! A fixed set of locales with a typed label struct: every label exists for
//! every locale by construction, so a missing key is a compile error rather
//! than a runtime condition.

use serde::Serialize;

/// Supported interface locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    Spanish,
    English,
    ChineseTraditional,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Spanish, Locale::English, Locale::ChineseTraditional];

    /// Key used by the UI to select this locale.
    pub fn key(self) -> &'static str {
        match self {
            Locale::Spanish => "Español",
            Locale::English => "English",
            Locale::ChineseTraditional => "中文 (繁體)",
        }
    }
}

/// The full label set for one locale.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Labels {
    pub sidebar_title: &'static str,
    pub lang_select: &'static str,
    pub level_select: &'static str,
    pub topic_select: &'static str,
    pub reset_btn: &'static str,
    pub chat_col: &'static str,
    pub notes_col: &'static str,
    pub notes_empty: &'static str,
    pub placeholder: &'static str,
    pub download_pdf: &'static str,
    pub contact_btn: &'static str,
    pub diag_mode: &'static str,
    pub select_prompt: &'static str,
    pub api_error: &'static str,
}

/// Labels for `locale`.
pub fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::Spanish => &Labels {
            sidebar_title: "Configuración",
            lang_select: "Idioma de la Interfaz",
            level_select: "Selecciona tu Nivel",
            topic_select: "Selecciona un Tema",
            reset_btn: "Reiniciar Sesión",
            chat_col: "Chat con Tutor IA",
            notes_col: "Pizarra Gramatical",
            notes_empty: "Las notas gramaticales aparecerán aquí.",
            placeholder: "Escribe tu mensaje en español...",
            download_pdf: "Descargar Informe (PDF)",
            contact_btn: "Contactar Profesor Nativo",
            diag_mode: "Modo Diagnóstico (Automático)",
            select_prompt: "Selecciona...",
            api_error: "Error al contactar el servicio del tutor.",
        },
        Locale::English => &Labels {
            sidebar_title: "Settings",
            lang_select: "Interface Language",
            level_select: "Select Level",
            topic_select: "Select Topic",
            reset_btn: "Reset Session",
            chat_col: "AI Tutor Chat",
            notes_col: "Grammar Board",
            notes_empty: "Grammar notes will appear here.",
            placeholder: "Type your message in Spanish...",
            download_pdf: "Download Report (PDF)",
            contact_btn: "Contact Native Teacher",
            diag_mode: "Diagnostic Mode (Auto)",
            select_prompt: "Select...",
            api_error: "Failed to reach the tutor service.",
        },
        Locale::ChineseTraditional => &Labels {
            sidebar_title: "設定",
            lang_select: "介面語言",
            level_select: "選擇等級",
            topic_select: "選擇主題",
            reset_btn: "重置會話",
            chat_col: "AI 導師聊天",
            notes_col: "文法白板",
            notes_empty: "文法筆記將顯示在這裡。",
            placeholder: "用西班牙語輸入您的訊息...",
            download_pdf: "下載報告 (PDF)",
            contact_btn: "聯繫母語老師",
            diag_mode: "診斷模式 (自動)",
            select_prompt: "選擇...",
            api_error: "無法連接導師服務。",
        },
    }
}
