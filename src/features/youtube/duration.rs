/// 解析 ISO-8601 时长（`P#DT#H#M#S`）为秒数。格式不认识时返回 0。
pub fn parse_iso8601_duration(raw: &str) -> u64 {
    let Some(rest) = raw.trim().strip_prefix('P') else {
        return 0;
    };
    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, t),
        None => (rest, ""),
    };

    let Some(days) = sum_components(date_part, &[('D', 86_400)]) else {
        return 0;
    };
    let Some(time) = sum_components(time_part, &[('H', 3_600), ('M', 60), ('S', 1)]) else {
        return 0;
    };
    days + time
}

/// 按固定顺序读取 `<数字><单位>` 片段；出现未知单位或乱序返回 None。
fn sum_components(mut s: &str, units: &[(char, u64)]) -> Option<u64> {
    let mut total = 0u64;
    let mut next_unit = 0;
    while !s.is_empty() {
        let digits = s.find(|c: char| !c.is_ascii_digit())?;
        if digits == 0 {
            return None;
        }
        let value: u64 = s[..digits].parse().ok()?;
        let unit = s[digits..].chars().next()?;
        let idx = units[next_unit..].iter().position(|(u, _)| *u == unit)? + next_unit;
        total = total.checked_add(value.checked_mul(units[idx].1)?)?;
        next_unit = idx + 1;
        s = &s[digits + unit.len_utf8()..];
    }
    Some(total)
}

/// 总时长向上取整为小时
pub fn ceil_hours(total_seconds: u64) -> u64 {
    total_seconds.div_ceil(3600)
}
