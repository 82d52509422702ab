/// Parse hex bytes written as `00CB7F`, `00 cb 7f`, `0x00,0xCB` or `00:CB:7F`.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, String> {
    let mut bytes = Vec::new();
    let tokens = input
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | ':' | '-'))
        .filter(|token| !token.is_empty());

    for token in tokens {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        let decoded = ::hex::decode(digits).map_err(|err| format!("invalid hex `{token}`: {err}"))?;
        bytes.extend(decoded);
    }
    Ok(bytes)
}

/// Uppercase, space separated.
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .chunks(1)
        .map(::hex::encode_upper)
        .collect::<Vec<_>>()
        .join(" ")
}
