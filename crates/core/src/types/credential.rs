//! Stored credential types.

use core::fmt;

/// A one-way password hash in PHC string format
/// (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`).
///
/// This is the only form a password is ever persisted in. The type is
/// deliberately not `Deserialize`: values come from the hasher or from
/// storage, never from a request body. `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap an encoded hash string.
    ///
    /// No parsing happens here; a malformed value simply fails verification.
    #[must_use]
    pub const fn from_encoded(encoded: String) -> Self {
        Self(encoded)
    }

    /// The encoded PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([REDACTED])")
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for HashedPassword {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for HashedPassword {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for HashedPassword {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
