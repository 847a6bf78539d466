//! Offline registry of Taiwan-listed securities
//!
//! Maps a security code (e.g. `2330`) to the company's short name. The
//! bundled table covers the large TWSE and TPEx listings; a JSON overlay
//! (`{"code": "name", ...}`) can add or replace entries at startup.

use crate::error::{BriefError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Bundled code → name table
const BUNDLED_LISTINGS: &[(&str, &str)] = &[
    // TWSE
    ("0050", "元大台灣50"),
    ("0056", "元大高股息"),
    ("00878", "國泰永續高股息"),
    ("1101", "台泥"),
    ("1102", "亞泥"),
    ("1216", "統一"),
    ("1301", "台塑"),
    ("1303", "南亞"),
    ("1326", "台化"),
    ("1402", "遠東新"),
    ("2002", "中鋼"),
    ("2059", "川湖"),
    ("2105", "正新"),
    ("2207", "和泰車"),
    ("2301", "光寶科"),
    ("2303", "聯電"),
    ("2308", "台達電"),
    ("2317", "鴻海"),
    ("2324", "仁寶"),
    ("2327", "國巨"),
    ("2330", "台積電"),
    ("2344", "華邦電"),
    ("2345", "智邦"),
    ("2353", "宏碁"),
    ("2356", "英業達"),
    ("2357", "華碩"),
    ("2376", "技嘉"),
    ("2377", "微星"),
    ("2379", "瑞昱"),
    ("2382", "廣達"),
    ("2395", "研華"),
    ("2408", "南亞科"),
    ("2409", "友達"),
    ("2412", "中華電"),
    ("2454", "聯發科"),
    ("2474", "可成"),
    ("2603", "長榮"),
    ("2609", "陽明"),
    ("2610", "華航"),
    ("2615", "萬海"),
    ("2618", "長榮航"),
    ("2880", "華南金"),
    ("2881", "富邦金"),
    ("2882", "國泰金"),
    ("2884", "玉山金"),
    ("2885", "元大金"),
    ("2886", "兆豐金"),
    ("2887", "台新金"),
    ("2890", "永豐金"),
    ("2891", "中信金"),
    ("2892", "第一金"),
    ("2912", "統一超"),
    ("3008", "大立光"),
    ("3017", "奇鋐"),
    ("3034", "聯詠"),
    ("3037", "欣興"),
    ("3045", "台灣大"),
    ("3231", "緯創"),
    ("3443", "創意"),
    ("3481", "群創"),
    ("3661", "世芯-KY"),
    ("3711", "日月光投控"),
    ("4904", "遠傳"),
    ("4938", "和碩"),
    ("5880", "合庫金"),
    ("6505", "台塑化"),
    ("6669", "緯穎"),
    ("9910", "豐泰"),
    // TPEx
    ("3105", "穩懋"),
    ("3293", "鈊象"),
    ("3529", "力旺"),
    ("5347", "世界"),
    ("5483", "中美晶"),
    ("6147", "頎邦"),
    ("6274", "台燿"),
    ("6446", "藥華藥"),
    ("6488", "環球晶"),
    ("8069", "元太"),
    ("8299", "群聯"),
];

/// Code → company name lookup table
#[derive(Debug, Clone, Default)]
pub struct SecurityRegistry {
    entries: HashMap<String, String>,
}

impl SecurityRegistry {
    /// Empty registry
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the bundled listings
    pub fn bundled() -> Self {
        Self {
            entries: BUNDLED_LISTINGS
                .iter()
                .map(|(code, name)| ((*code).to_string(), (*name).to_string()))
                .collect(),
        }
    }

    /// Add or replace one entry
    pub fn insert(&mut self, code: impl AsRef<str>, name: impl Into<String>) {
        self.entries
            .insert(normalize_code(code.as_ref()), name.into());
    }

    /// Merge a JSON object of `code → name` pairs over the current entries
    pub fn with_overlay_json(mut self, json: &str) -> Result<Self> {
        let overlay: HashMap<String, String> = serde_json::from_str(json).map_err(|e| {
            BriefError::ConfigError(format!("registry overlay is not a code→name object: {e}"))
        })?;

        for (code, name) in overlay {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            self.insert(&code, name);
        }
        Ok(self)
    }

    /// Merge a JSON overlay file
    pub fn with_overlay_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            BriefError::ConfigError(format!("cannot read registry file {}: {e}", path.display()))
        })?;
        let registry = self.with_overlay_json(&json)?;
        debug!(path = %path.display(), entries = registry.len(), "Loaded registry overlay");
        Ok(registry)
    }

    /// Name for a code; the code is normalized before lookup
    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.entries
            .get(&normalize_code(code))
            .map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
