use std::fmt;
use std::str::FromStr;

use crate::error::PrepareError;

pub const ID_SIZE: usize = 4;
pub const USERNAME_SIZE: usize = 33;
pub const EMAIL_SIZE: usize = 256;
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_SIZE + EMAIL_SIZE;

/// A single fixed-width record: an id plus two null-terminated, fixed
/// capacity strings. `username`/`email` hold at most
/// `USERNAME_SIZE - 1`/`EMAIL_SIZE - 1` bytes so there is always room for
/// the trailing NUL.
pub struct Row {
    id: u32,
    username: [u8; USERNAME_SIZE],
    email: [u8; EMAIL_SIZE],
}

impl Row {
    pub fn new(id: u32, username: &str, email: &str) -> Result<Self, PrepareError> {
        if username.len() >= USERNAME_SIZE {
            return Err(PrepareError::StringTooLong);
        }
        if email.len() >= EMAIL_SIZE {
            return Err(PrepareError::StringTooLong);
        }

        let mut username_bytes = [0; USERNAME_SIZE];
        username_bytes[..username.len()].copy_from_slice(username.as_bytes());

        let mut email_bytes = [0; EMAIL_SIZE];
        email_bytes[..email.len()].copy_from_slice(email.as_bytes());

        Ok(Self {
            id,
            username: username_bytes,
            email: email_bytes,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn username(&self) -> String {
        String::from_utf8_lossy(&self.username)
            .trim_end_matches('\0')
            .to_string()
    }

    pub fn email(&self) -> String {
        String::from_utf8_lossy(&self.email)
            .trim_end_matches('\0')
            .to_string()
    }

    pub fn serialize(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), ROW_SIZE);
        out[0..ID_SIZE].copy_from_slice(&self.id.to_le_bytes());
        out[ID_SIZE..ID_SIZE + USERNAME_SIZE].copy_from_slice(&self.username);
        out[ID_SIZE + USERNAME_SIZE..ROW_SIZE].copy_from_slice(&self.email);
    }

    pub fn deserialize(bytes: &[u8]) -> Self {
        debug_assert_eq!(bytes.len(), ROW_SIZE);

        let mut id_bytes = [0; ID_SIZE];
        id_bytes.copy_from_slice(&bytes[0..ID_SIZE]);
        let id = u32::from_le_bytes(id_bytes);

        let mut username = [0; USERNAME_SIZE];
        username.copy_from_slice(&bytes[ID_SIZE..ID_SIZE + USERNAME_SIZE]);

        let mut email = [0; EMAIL_SIZE];
        email.copy_from_slice(&bytes[ID_SIZE + USERNAME_SIZE..ROW_SIZE]);

        Self {
            id,
            username,
            email,
        }
    }
}

impl FromStr for Row {
    type Err = PrepareError;

    fn from_str(args: &str) -> Result<Self, Self::Err> {
        let columns: Vec<&str> = args.split_whitespace().collect();
        match columns[..] {
            [id, username, email] => {
                let id: i64 = id.parse().map_err(|_| PrepareError::SyntaxError)?;
                if id < 0 {
                    return Err(PrepareError::InvalidId);
                }
                Row::new(id as u32, username, email)
            }
            _ => Err(PrepareError::SyntaxError),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username(), self.email())
    }
}
