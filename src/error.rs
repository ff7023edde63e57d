use thiserror::Error;

use crate::access::Capability;

/// Input that could not be turned into a ledger value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Pola pembayaran tidak valid: '{0}'. Gunakan '1 bulan' sampai '12 bulan'.")]
    InvalidPattern(String),
    #[error("Nomor kamar '{0}' bukan angka.")]
    InvalidRoomNumber(String),
    #[error("Format tanggal tidak valid: '{0}'. Gunakan format YYYY-MM-DD.")]
    InvalidDate(String),
}

/// Well-formed input that the ledger refuses to apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Kamar dengan indeks {0} tidak ditemukan.")]
    RoomNotFound(usize),
    #[error("Penghuni dengan indeks {0} tidak ditemukan.")]
    TenantNotFound(usize),
    #[error("Pembayaran dengan indeks {0} tidak ditemukan.")]
    PaymentNotFound(usize),
    #[error("Kamar No {0} sudah ada.")]
    DuplicateRoom(String),
    #[error("Link bukti bayar tidak valid: '{0}'.")]
    InvalidProofLink(String),
    #[error("Tanggal pembayaran berikutnya di luar jangkauan.")]
    DateOverflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Akses ditolak: {0}.")]
    Forbidden(Capability),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("ID atau password salah.")]
    InvalidCredentials,
    #[error("Silakan login terlebih dahulu.")]
    MissingToken,
    #[error("Sesi tidak ditemukan atau sudah berakhir.")]
    UnknownSession,
}

/// Failure of an operation that runs against a stored session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<ParseError> for SessionError {
    fn from(err: ParseError) -> Self {
        Self::Ledger(err.into())
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        Self::Ledger(err.into())
    }
}
