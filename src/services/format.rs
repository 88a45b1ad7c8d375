/// `₹` followed by the amount grouped the Indian way: the last three digits,
/// then pairs (`120000` → `₹1,20,000`).
pub fn format_price(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };

    if digits.len() <= 3 {
        return format!("{sign}₹{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{sign}₹{},{tail}", groups.join(","))
}

pub fn format_time(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{minutes} mins");
    }

    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{hours} hours")
    } else {
        format!("{hours}h {rest}m")
    }
}
