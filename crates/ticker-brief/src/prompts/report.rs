//! The investment-brief prompt
//!
//! Variables: `symbol`, `name`, `market`, `news`.

use brief_prompt::{JinjaTemplate, Result};

/// Registered name of the report prompt
pub const REPORT_TEMPLATE_NAME: &str = "brief.report";

const REPORT_EN: &str = r#"You are a professional financial investment analyst. Based on the latest news and financial information collected below, analyze the stock {{ symbol }}{% if name != symbol %} ({{ name }}){% endif %}, listed in {{ market }}.

[Collected information]
{{ news }}

Answer in English using the following structure:
1. **Market sentiment summary**: the overall sentiment of current news toward the company (bullish / bearish / neutral).
2. **Key recent developments**: the 3 most important recent events or earnings figures.
3. **Industry trends**: the current state of the company's industry.
4. **Investment recommendation**:
   - Give a rating (Strong Buy / Buy / Hold / Sell).
   - Explain the reasoning (risks and opportunities).

Note: this analysis is based on news only. End with the disclaimer "Investing involves risk; please evaluate carefully on your own."
"#;

const REPORT_ZH_TW: &str = r#"你是一位專業的金融投資分析師。請根據以下蒐集到的最新新聞與財經資訊，分析股票代號：{{ symbol }}{% if name != symbol %}（{{ name }}）{% endif %}（{{ market }}）。

【搜尋到的資訊】：
{{ news }}

請以繁體中文回答，並依照以下格式輸出：
1. **市場情緒摘要**：綜合目前新聞對該公司的情緒（看多/看空/中立）。
2. **最新關鍵消息**：列出 3 點最重要的近期事件或財報數據。
3. **產業趨勢**：該公司所處產業目前的狀況。
4. **投資建議**：
   - 給予評級（強力買進 / 買進 / 觀望 / 賣出）。
   - 說明理由（風險與機會）。

注意：這只是基於新聞的分析，請在最後加上「投資有風險，請自行評估」的警語。
"#;

/// Build the bilingual report template
pub fn report_template() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(REPORT_TEMPLATE_NAME, REPORT_EN, REPORT_ZH_TW)
}
