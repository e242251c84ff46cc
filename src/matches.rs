/// Generate a `const fn(u8) -> bool` backed by a 256 entry lookup table built at compile time.
macro_rules! byte_map {
    {
        $(#[$meta:meta])*
        $vis:vis const fn $fn_id:ident($byte:ident: u8) { $e:expr }
    } => {
        $(#[$meta])*
        $vis const fn $fn_id($byte: u8) -> bool {
            const PAT: [bool; 256] = {
                let mut bytes = [false; 256];
                let mut $byte = 0u8;
                const fn filter($byte: u8) -> bool {
                    $e
                }
                loop {
                    bytes[$byte as usize] = filter($byte);
                    if $byte == 255 {
                        break;
                    }
                    $byte += 1;
                }
                bytes
            };
            PAT[$byte as usize]
        }
    };
}

byte_map! {
    /// tchar = "!" / "#" / "$" / "%" / "&" / "'" / "*" / "+" / "-" / "." /
    ///         "^" / "_" / "`" / "|" / "~" / DIGIT / ALPHA
    #[inline(always)]
    pub(crate) const fn is_token(byte: u8) {
        byte.is_ascii_alphanumeric()
            || matches!(
                byte,
                b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
                    | b'`' | b'|' | b'~'
            )
    }
}

/// Methods are restricted to upper case ASCII letters.
#[inline(always)]
pub(crate) const fn is_method(byte: u8) -> bool {
    byte.is_ascii_uppercase()
}

/// Spaces and horizontal tabs allowed before a header name.
#[inline(always)]
pub(crate) const fn is_leading_ws(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t')
}
