use bytes::Bytes;

use crate::common::StocklyError;

const PDF_SIGNATURE: &[u8] = b"%PDF";

/// Accept `body` only if it is a pdf document.
pub fn validate_pdf(body: Bytes) -> crate::Result<Bytes> {
    if body.starts_with(PDF_SIGNATURE) {
        Ok(body)
    } else {
        Err(StocklyError::InvalidPdf { len: body.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature() {
        assert!(validate_pdf(Bytes::from_static(b"%PDF-1.7\n...")).is_ok());
        assert!(matches!(
            validate_pdf(Bytes::from_static(b"<html>error</html>")),
            Err(StocklyError::InvalidPdf { len: 18 })
        ));
        assert!(validate_pdf(Bytes::new()).is_err());
    }
}
