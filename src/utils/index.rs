/// FIL carries 18 decimal places.
const FIL_DECIMALS: usize = 18;

/// Render a decimal attoFIL string as whole FIL for logs. Amounts exceed
/// `u64`, so this is plain string arithmetic; anything that is not a bare
/// decimal number is returned unchanged.
pub fn format_fil_amount(atto: &str) -> String {
	if atto.is_empty() || !atto.bytes().all(|b| b.is_ascii_digit()) {
		return atto.to_string();
	}

	let padded = format!("{atto:0>width$}", width = FIL_DECIMALS + 1);
	let (whole, frac) = padded.split_at(padded.len() - FIL_DECIMALS);
	let frac = frac.trim_end_matches('0');

	if frac.is_empty() {
		whole.to_string()
	} else {
		format!("{whole}.{frac}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn formats_whole_and_fractional_amounts() {
		assert_eq!(format_fil_amount("795400000000000000000"), "795.4");
		assert_eq!(format_fil_amount("1000000000000000000"), "1");
		assert_eq!(format_fil_amount("1"), "0.000000000000000001");
		assert_eq!(format_fil_amount("0"), "0");
	}

	#[test]
	fn passes_through_non_numeric_input() {
		assert_eq!(format_fil_amount(""), "");
		assert_eq!(format_fil_amount("12x4"), "12x4");
	}
}
