// ==========================================
// WCM 设备台账 - 部件属性单元格编辑器
// ==========================================
// 点击部件属性单元格 → 行内输入框（分级为下拉 A/B/C）
// Enter / 失焦: 值有变化则生成单字段补丁
// Escape: 放弃编辑，不发请求
// 数值字段按 parseInt 语义转换: 空串 → null，"12abc" → 12
// ==========================================

use crate::domain::asset_part::{AssetPart, FieldKind, PartField};
use serde_json::{Map, Number, Value};

/// 分级下拉选项
pub const CLASSIFICATION_OPTIONS: [&str; 3] = ["A", "B", "C"];

/// 编辑控件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorControl {
    Text,
    Select(&'static [&'static str]),
}

/// 结束编辑的按键 / 事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Enter,
    Blur,
    Escape,
}

/// 单字段补丁: PATCH /assets/parts/{id} 的请求体 `{field: value}`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPatch {
    pub asset_part_id: String,
    pub field: PartField,
    pub value: Value,
}

impl FieldPatch {
    pub fn to_body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert(self.field.wire_name().to_string(), self.value.clone());
        body
    }
}

/// 结束编辑的结果
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Escape，丢弃输入
    Cancelled,
    /// 值未变化，不发请求
    Unchanged,
    /// 需要提交的补丁
    Commit(FieldPatch),
}

// ==========================================
// CellEditor - 行内编辑状态
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct CellEditor {
    asset_part_id: String,
    field: PartField,
    original: String,
    draft: String,
}

impl CellEditor {
    /// 以当前值打开编辑器
    pub fn open(part: &AssetPart, field: PartField) -> Self {
        let original = field.display_value(part);
        Self {
            asset_part_id: part.id.clone(),
            field,
            draft: original.clone(),
            original,
        }
    }

    pub fn asset_part_id(&self) -> &str {
        &self.asset_part_id
    }

    pub fn field(&self) -> PartField {
        self.field
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn control(&self) -> EditorControl {
        match self.field {
            PartField::ComponentClassification => EditorControl::Select(&CLASSIFICATION_OPTIONS),
            _ => EditorControl::Text,
        }
    }

    pub fn input(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    /// 结束编辑
    pub fn finish(self, key: EditorKey) -> EditOutcome {
        if key == EditorKey::Escape {
            return EditOutcome::Cancelled;
        }

        let before = coerce_input(self.field, &self.original);
        let after = coerce_input(self.field, &self.draft);
        if before == after {
            return EditOutcome::Unchanged;
        }

        EditOutcome::Commit(FieldPatch {
            asset_part_id: self.asset_part_id,
            field: self.field,
            value: after,
        })
    }
}

/// 输入文本 → JSON 值
///
/// - Integer: parseInt 语义，无前导整数 → null
/// - Real: 前导十进制数，无 → null
/// - Flag: true/1/yes/y → true，其余非空 → false
/// - Text: 去空格后为空 → null
pub fn coerce_input(field: PartField, raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match field.kind() {
        FieldKind::Integer => parse_int_prefix(trimmed)
            .map(|n| Value::Number(n.into()))
            .unwrap_or(Value::Null),
        FieldKind::Real => parse_float_prefix(trimmed)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        FieldKind::Flag => Value::Bool(matches!(
            trimmed.to_lowercase().as_str(),
            "true" | "1" | "yes" | "y"
        )),
        FieldKind::Text => Value::String(trimmed.to_string()),
    }
}

/// 前导整数（可带正负号），"12abc" → 12，"abc" → None
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// 前导十进制数，"1.5kg" → 1.5
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    s[..end].trim_end_matches('.').parse::<f64>().ok()
}
