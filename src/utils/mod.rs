/// Number of decimal places in the Diadem native token.
pub const DIADEM_TOKEN_DECIMALS: u32 = 8;

pub fn format_token_amount(amount: u128, decimals: u32) -> String {
	format!(
		"{:.*}",
		decimals as usize,
		amount as f64 / 10f64.powi(decimals as i32)
	)
}

/// Scale a display-unit amount into base units for the chain provider.
pub fn to_base_units(amount: u64) -> u128 {
	amount as u128 * 10u128.pow(DIADEM_TOKEN_DECIMALS)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn formats_whole_tokens() {
		assert_eq!(format_token_amount(150_000_000, 8), "1.50000000");
	}

	#[test]
	fn scales_display_amounts() {
		assert_eq!(to_base_units(3), 300_000_000);
	}
}
