//! 内置文本模板
//!
//! 前端“快速填充”使用的示例文本

use serde::Serialize;

use super::speech::Language;

/// 文本模板
#[derive(Debug, Clone, Serialize)]
pub struct TextTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub language: Language,
    pub text: &'static str,
}

const TEMPLATES: &[TextTemplate] = &[
    TextTemplate {
        id: "greeting-es",
        name: "Saludo",
        language: Language::Es,
        text: "¡Hola! Bienvenido a nuestro servicio de texto a voz.",
    },
    TextTemplate {
        id: "greeting-en",
        name: "Greeting",
        language: Language::En,
        text: "Hello! Welcome to our text to speech service.",
    },
    TextTemplate {
        id: "voicemail-es",
        name: "Buzón de voz",
        language: Language::Es,
        text: "En este momento no podemos atender su llamada. Por favor, deje su mensaje después del tono.",
    },
    TextTemplate {
        id: "voicemail-en",
        name: "Voicemail",
        language: Language::En,
        text: "We are unable to take your call right now. Please leave a message after the tone.",
    },
    TextTemplate {
        id: "announcement-fr",
        name: "Annonce",
        language: Language::Fr,
        text: "Mesdames et messieurs, le magasin fermera ses portes dans quinze minutes.",
    },
    TextTemplate {
        id: "reminder-de",
        name: "Erinnerung",
        language: Language::De,
        text: "Vergessen Sie nicht, Ihren Termin morgen um zehn Uhr zu bestätigen.",
    },
    TextTemplate {
        id: "welcome-ja",
        name: "ようこそ",
        language: Language::Ja,
        text: "いらっしゃいませ。本日はご来店ありがとうございます。",
    },
    TextTemplate {
        id: "welcome-zh",
        name: "欢迎",
        language: Language::Zh,
        text: "欢迎使用文字转语音服务，祝您使用愉快。",
    },
];

/// 获取所有内置模板
pub fn builtin_templates() -> &'static [TextTemplate] {
    TEMPLATES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SynthesisPolicy;

    #[test]
    fn test_templates_are_valid_inputs() {
        let policy = SynthesisPolicy::default();
        for template in builtin_templates() {
            assert!(policy.validate_text(template.text).is_ok(), "{}", template.id);
            assert!(policy.languages().contains(&template.language));
        }
    }

    #[test]
    fn test_template_ids_unique() {
        let mut ids: Vec<_> = builtin_templates().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), builtin_templates().len());
    }
}
