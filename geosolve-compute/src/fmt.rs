//! Utility functions to format floating-point numbers the way the results are reported to users.

/// Formats a float using the shortest representation that round-trips, always showing a
/// fractional part or an exponent, e.g. `5.0`, `0.1`, `1e+16`, `1.5e-05`.
///
/// Numbers whose magnitude is at least `1e16` or below `1e-4` use scientific notation with a
/// signed, at-least-two-digit exponent.
pub fn python_float(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n.is_sign_negative() { "-inf" } else { "inf" }.to_string();
    }

    let abs = n.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        return scientific(n);
    }

    let mut s = n.to_string();
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

/// Formats a float in scientific notation, using the exponent style `e+16` / `e-05`.
fn scientific(n: f64) -> String {
    let s = format!("{:e}", n);
    let Some((mantissa, exponent)) = s.split_once('e') else {
        return s;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}

/// Formats a complex number as `re + im*I` with both parts formatted by [`python_float`], e.g.
/// `-0.5 - 0.8660254037844386*I`. A zero real part is left out.
pub fn complex_float(re: f64, im: f64) -> String {
    let imag = format!("{}*I", python_float(im.abs()));
    match (re == 0.0, im.is_sign_negative()) {
        (true, false) => imag,
        (true, true) => format!("-{}", imag),
        (false, false) => format!("{} + {}", python_float(re), imag),
        (false, true) => format!("{} - {}", python_float(re), imag),
    }
}

/// Formats a float with exactly six digits after the decimal point.
pub fn fixed6(n: f64) -> String {
    format!("{:.6}", n)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn whole_numbers_keep_a_fraction() {
        assert_eq!(python_float(5.0), "5.0");
        assert_eq!(python_float(-2.0), "-2.0");
        assert_eq!(python_float(0.0), "0.0");
    }

    #[test]
    fn shortest_round_trip() {
        assert_eq!(python_float(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(python_float(2.5), "2.5");
        assert_eq!(python_float(std::f64::consts::PI), "3.141592653589793");
    }

    #[test]
    fn scientific_bounds() {
        assert_eq!(python_float(1e16), "1e+16");
        assert_eq!(python_float(1.5e-5), "1.5e-05");
        assert_eq!(python_float(0.0001), "0.0001");
        assert_eq!(python_float(1e15), "1000000000000000.0");
        assert_eq!(python_float(-2.5e-10), "-2.5e-10");
    }

    #[test]
    fn non_finite() {
        assert_eq!(python_float(f64::NAN), "nan");
        assert_eq!(python_float(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn complex_parts() {
        assert_eq!(complex_float(-0.5, -0.8660254037844386), "-0.5 - 0.8660254037844386*I");
        assert_eq!(complex_float(-1.0, 2.0), "-1.0 + 2.0*I");
        assert_eq!(complex_float(0.0, 1.0), "1.0*I");
        assert_eq!(complex_float(-0.0, -1.0), "-1.0*I");
    }

    #[test]
    fn six_places() {
        assert_eq!(fixed6(0.5), "0.500000");
        assert_eq!(fixed6(std::f64::consts::FRAC_1_SQRT_2), "0.707107");
    }
}
