// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(normalize_locale(locale));
}

/// 语言代码归一化（zh / zh_CN / zh-cn → zh-CN，其余 → en）
pub fn normalize_locale(raw: &str) -> &'static str {
    let lowered = raw.trim().to_lowercase().replace('_', "-");
    if lowered == "zh" || lowered.starts_with("zh-") {
        "zh-CN"
    } else {
        "en"
    }
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use wcm_ledger::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 按指定语言翻译（不修改全局语言）
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = normalize_locale(locale)).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use wcm_ledger::i18n::t_with_args;
/// let msg = t_with_args("import.file_not_found", &[("path", "/tmp/parts.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    fill_args(rust_i18n::t!(key).to_string(), args)
}

/// 按指定语言翻译（带参数）
pub fn t_in_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    fill_args(t_in(locale, key), args)
}

fn fill_args(mut result: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh_CN");
        assert_eq!(current_locale(), "zh-CN");

        set_locale("en");
        assert_eq!(current_locale(), "en");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(t("common.success"), "操作成功");

        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("import.file_not_found", &[("path", "/tmp/parts.csv")]);
        assert!(msg.contains("/tmp/parts.csv"));
        assert!(msg.contains("File not found"));
    }

    #[test]
    fn test_translate_in_explicit_locale() {
        // 不依赖全局语言
        assert_eq!(t_in("zh", "ledger.legend.types.PM"), "预防维护");
        assert_eq!(t_in("en", "ledger.legend.types.PM"), "Preventive Maintenance");
        assert_eq!(
            t_in_with_args("en", "ledger.week", &[("week", "14")]),
            "Week 14"
        );
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("zh-cn"), "zh-CN");
        assert_eq!(normalize_locale("fr"), "en");
        assert_eq!(normalize_locale(""), "en");
    }
}
