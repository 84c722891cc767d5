//! Utility functions and helpers

/// Group the digits of an unsigned integer string with a separator
pub fn group_thousands(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let len = digits.chars().count();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push_str(separator);
        }
        result.push(c);
    }
    result
}

/// Escape text for interpolation into HTML bodies and attributes
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Account types offered by the type filter
pub const ACCOUNT_TYPES: &[&str] = &[
    "Bank",
    "Accounts Receivable",
    "Other Current Asset",
    "Fixed Asset",
    "Other Asset",
    "Accounts Payable",
    "Credit Card",
    "Other Current Liability",
    "Long Term Liability",
    "Equity",
    "Income",
    "Cost of Goods Sold",
    "Expense",
    "Other Expense",
];

/// Badge classes for an account type
pub fn account_type_color(account_type: &str) -> &'static str {
    match account_type {
        "Bank" => "bg-blue-100 text-blue-800",
        "Accounts Receivable" => "bg-green-100 text-green-800",
        "Other Current Asset" => "bg-teal-100 text-teal-800",
        "Fixed Asset" => "bg-purple-100 text-purple-800",
        "Other Asset" => "bg-indigo-100 text-indigo-800",
        "Accounts Payable" => "bg-red-100 text-red-800",
        "Credit Card" => "bg-orange-100 text-orange-800",
        "Other Current Liability" | "Long Term Liability" => "bg-rose-100 text-rose-800",
        "Equity" => "bg-yellow-100 text-yellow-800",
        "Income" => "bg-emerald-100 text-emerald-800",
        "Cost of Goods Sold" | "Expense" | "Other Expense" => "bg-amber-100 text-amber-800",
        _ => "bg-gray-100 text-gray-800",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0", ","), "0");
        assert_eq!(group_thousands("999", ","), "999");
        assert_eq!(group_thousands("1000", ","), "1,000");
        assert_eq!(group_thousands("1234567", "."), "1.234.567");
        assert_eq!(group_thousands("123456", " "), "123 456");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Cash & <Bank>"), "Cash &amp; &lt;Bank&gt;");
        assert_eq!(escape_html(r#"a"b'c"#), "a&quot;b&#39;c");
    }

    #[test]
    fn test_account_type_color() {
        assert_eq!(account_type_color("Bank"), "bg-blue-100 text-blue-800");
        assert_eq!(account_type_color("Unknown"), "bg-gray-100 text-gray-800");
    }
}
