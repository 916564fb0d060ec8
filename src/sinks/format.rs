/// Renders an x100 fixed-point value as `<whole>.<frac:02>`.
pub(crate) fn format_x100(value: u64) -> String {
    let whole = value.checked_div(100).unwrap_or(0);
    let frac = value.checked_rem(100).unwrap_or(0);
    format!("{}.{:02}", whole, frac)
}
