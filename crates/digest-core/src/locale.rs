//! Supported locales, prompt phrase tables and user-facing error messages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ErrorKind;
use crate::options::{Audience, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::ZhTw];

    /// Resolve a locale tag, falling back to English for anything unsupported.
    pub fn from_tag(tag: &str) -> Locale {
        let normalized = tag.trim().replace('_', "-").to_ascii_lowercase();
        match normalized.as_str() {
            "zh-tw" => Locale::ZhTw,
            "en" => Locale::En,
            other => {
                if !other.is_empty() && !other.starts_with("en-") {
                    tracing::debug!(tag, "unsupported locale, falling back to en");
                }
                Locale::En
            }
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::ZhTw => "zh-TW",
        }
    }

    pub(crate) fn phrases(self) -> &'static PhraseTable {
        match self {
            Locale::En => &EN,
            Locale::ZhTw => &ZH_TW,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Prompt phrases for one locale. `{outputFormat}`, `{wordCount}` and
/// `{audience}` are substituted by the prompt builder.
pub(crate) struct PhraseTable {
    pub system_instruction: &'static str,
    pub header: &'static str,
    pub task: &'static str,
    pub length: &'static str,
    pub audience: &'static str,
    pub focus: &'static str,
    pub analysis: &'static str,
    audiences: [&'static str; 4],
    formats: [&'static str; 2],
}

impl PhraseTable {
    pub fn audience_label(&self, audience: Audience) -> &'static str {
        match audience {
            Audience::Academic => self.audiences[0],
            Audience::Executive => self.audiences[1],
            Audience::Public => self.audiences[2],
            Audience::Student => self.audiences[3],
        }
    }

    pub fn format_label(&self, format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Paragraph => self.formats[0],
            OutputFormat::BulletPoints => self.formats[1],
        }
    }
}

static EN: PhraseTable = PhraseTable {
    system_instruction: "You are a senior, rigorous academic research assistant. You are strictly forbidden from fabricating or generating information that does not exist in the original text. All summary content must be based on and faithful to the original text. Your default output should include four sections: 'Research Background', 'Methodology', 'Results', and 'Conclusion'.",
    header: "Please process the following research paper and generate a summary based on my requirements:",
    task: "1. Task: Generate a summary in the format of {outputFormat}.",
    length: "2. Length Requirement: The total word count should be approximately {wordCount} words.",
    audience: "3. Audience Adjustment: Please adjust the content and tone to be suitable for a {audience}.",
    focus: "4. Content Focus: The summary must focus on the key findings and contributions of the research.",
    analysis: "5. Analysis Mode: After the summary, add a section titled \"Research Evaluation\" and list 3 potential limitations of this research.",
    audiences: [
        "Academic Researcher",
        "Corporate Executive",
        "General Public",
        "University Student",
    ],
    formats: ["paragraph", "bullet points"],
};

static ZH_TW: PhraseTable = PhraseTable {
    system_instruction: "您是一位資深、嚴謹的學術研究助理。嚴禁您杜撰或生成原始文本中不存在的資訊。所有摘要內容必須基於並忠於原始文本。您的預設輸出應包含四個部分：'研究背景'、'研究方法'、'研究結果'和'結論'。",
    header: "請處理以下研究論文，並根據我的要求生成摘要：",
    task: "1. 任務：以 {outputFormat} 的格式生成摘要。",
    length: "2. 長度要求：總字數應約為 {wordCount} 字。",
    audience: "3. 讀者調整：請調整內容和語氣，使其適合 {audience}。",
    focus: "4. 內容重點：摘要必須聚焦於研究的主要發現和貢獻。",
    analysis: "5. 分析模式：在摘要之後，新增一個標題為 \"研究評估\" 的部分，並列出此研究的 3 個潛在限制。",
    audiences: ["學術研究員", "企業主管", "一般大眾", "大專院校學生"],
    formats: ["段落", "重點條列"],
};

/// User-facing message for an error kind.
pub fn error_message(kind: ErrorKind, locale: Locale) -> &'static str {
    match locale {
        Locale::En => match kind {
            ErrorKind::UnsupportedType => {
                "Unsupported file type. Please upload a PDF, DOCX, or TXT file."
            }
            ErrorKind::PdfLibMissing => {
                "PDF processing library could not be loaded. Please check your installation and try again."
            }
            ErrorKind::DocxLibMissing => {
                "Word document processing library could not be loaded. Please check your installation and try again."
            }
            ErrorKind::PdfParseFailed => {
                "Could not parse the PDF file. It might be corrupted or protected."
            }
            ErrorKind::DocxParseFailed => {
                "Could not parse the DOCX file. Please ensure it is a valid .docx file."
            }
            ErrorKind::TextReadFailed => "Failed to read the text file.",
            ErrorKind::MissingCredential => {
                "No API key is configured. Set GEMINI_API_KEY or add it to the config file."
            }
            ErrorKind::GenerationFailed => {
                "An error occurred while generating the summary. Please check your API key and try again."
            }
            ErrorKind::MissingInput => "Please paste the paper text before generating a summary.",
        },
        Locale::ZhTw => match kind {
            ErrorKind::UnsupportedType => "不支援的檔案類型。請上傳 PDF、DOCX 或 TXT 檔案。",
            ErrorKind::PdfLibMissing => "無法載入 PDF 處理函式庫。請檢查您的安裝並再試一次。",
            ErrorKind::DocxLibMissing => {
                "無法載入 Word 文件處理函式庫。請檢查您的安裝並再試一次。"
            }
            ErrorKind::PdfParseFailed => "無法解析 PDF 檔案。檔案可能已損壞或受保護。",
            ErrorKind::DocxParseFailed => "無法解析 DOCX 檔案。請確保它是有效的 .docx 檔案。",
            ErrorKind::TextReadFailed => "讀取文字檔失敗。",
            ErrorKind::MissingCredential => {
                "尚未設定 API 金鑰。請設定 GEMINI_API_KEY 或將其加入設定檔。"
            }
            ErrorKind::GenerationFailed => "生成摘要時發生錯誤。請檢查您的 API 金鑰並再試一次。",
            ErrorKind::MissingInput => "生成摘要前，請先貼上論文內容。",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_resolve_case_insensitively() {
        assert_eq!(Locale::from_tag("zh-TW"), Locale::ZhTw);
        assert_eq!(Locale::from_tag("ZH_tw"), Locale::ZhTw);
        assert_eq!(Locale::from_tag("en"), Locale::En);
    }

    #[test]
    fn unsupported_tags_fall_back_to_english() {
        for tag in ["fr", "zh-CN", "", "en-GB"] {
            assert_eq!(Locale::from_tag(tag), Locale::En, "tag {tag:?}");
        }
    }

    #[test]
    fn tag_round_trips() {
        for locale in Locale::ALL {
            assert_eq!(Locale::from_tag(locale.tag()), locale);
        }
    }

    #[test]
    fn every_error_has_a_message_in_every_locale() {
        for locale in Locale::ALL {
            for kind in ErrorKind::ALL {
                assert!(!error_message(kind, locale).is_empty());
            }
        }
    }

    #[test]
    fn english_labels_name_the_audience() {
        let t = Locale::En.phrases();
        assert_eq!(t.audience_label(Audience::Executive), "Corporate Executive");
        assert_eq!(t.format_label(OutputFormat::BulletPoints), "bullet points");
    }
}
