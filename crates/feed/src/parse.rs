use horizon_core::market::entity::{PricePoint, SymbolMatch};
use serde_json::Value;
use tracing::debug;

/// 已知的结果信封位置，按顺序尝试，首个命中的数组生效。
const RESULT_ENVELOPES: &[&str] = &["/data/results", "/results"];

/// 时间戳字段的可接受别名（毫秒时间戳）。
const TIMESTAMP_FIELDS: &[&str] = &["timestamp", "t", "time"];

/// 收盘价字段的可接受别名。
const CLOSE_FIELDS: &[&str] = &["close", "c"];

/// # Summary
/// 从响应体中定位结果数组。
///
/// # Logic
/// 1. 依次用 JSON Pointer 查找 `RESULT_ENVELOPES` 中的位置。
/// 2. 返回首个数组；都不匹配时返回空切片。
pub(crate) fn results(body: &Value) -> &[Value] {
    RESULT_ENVELOPES
        .iter()
        .find_map(|pointer| body.pointer(pointer).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// # Summary
/// 将聚合接口响应归一化为价格数据点。
///
/// # Logic
/// 1. 定位结果数组（未知结构得到空列表）。
/// 2. 对每个条目按别名顺序提取时间戳与收盘价。
/// 3. 任一字段缺失或类型不符的条目被丢弃。
///
/// # Returns
/// 保持响应原始顺序的数据点列表。
pub(crate) fn aggregates(body: &Value) -> Vec<PricePoint> {
    let items = results(body);
    let points: Vec<PricePoint> = items.iter().filter_map(price_point).collect();
    if points.len() < items.len() {
        debug!(
            "Dropped {} aggregate items without timestamp/close",
            items.len() - points.len()
        );
    }
    points
}

fn price_point(item: &Value) -> Option<PricePoint> {
    let timestamp_ms = first_field(item, TIMESTAMP_FIELDS).and_then(as_millis)?;
    let close = first_field(item, CLOSE_FIELDS)
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())?;
    Some(PricePoint::new(timestamp_ms, close))
}

fn first_field<'a>(item: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .find_map(|name| item.get(name).filter(|v| !v.is_null()))
}

/// 整数或取整数值的浮点数（如 `1700000000000.0`）均视为毫秒时间戳。
fn as_millis(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .and_then(|f| format!("{:.0}", f).parse().ok())
    })
}

/// # Summary
/// 将搜索接口响应归一化为候选列表，无法识别的条目被跳过。
pub(crate) fn symbol_matches(body: &Value) -> Vec<SymbolMatch> {
    results(body)
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

/// 提取错误信封中的 `message` 字段。
pub(crate) fn error_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.pointer("/error/message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
