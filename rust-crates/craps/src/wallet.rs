
/// Balance as reported by the wallet, kept in its decimal string form.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Balance {
    pub formatted: String,
}

impl Balance {
    pub fn new(formatted: impl Into<String>) -> Self {
        Self {
            formatted: formatted.into(),
        }
    }

    /// Numeric value of the balance; anything unparseable reads as zero.
    pub fn amount(&self) -> f64 {
        self.formatted
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

/// Read-only view of the connected wallet.
pub trait WalletAccount {
    fn address(&self) -> Option<String>;

    fn balance(&self) -> Option<Balance>;

    fn is_connected(&self) -> bool {
        self.address().is_some()
    }
}

/// Wallet whose address and balance are fixed at startup.
#[derive(Clone, Debug, Default)]
pub struct StaticWallet {
    address: Option<String>,
    balance: Option<Balance>,
}

impl StaticWallet {
    pub fn new(address: Option<String>, balance: Option<Balance>) -> Self {
        Self { address, balance }
    }

    pub fn connected(address: impl Into<String>, balance: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            balance: Some(Balance::new(balance)),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }
}

impl WalletAccount for StaticWallet {
    fn address(&self) -> Option<String> {
        self.address.clone()
    }

    fn balance(&self) -> Option<Balance> {
        self.balance.clone()
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    #[test]
    fn amount__parses_decimal_string_or_falls_back_to_zero() {
        assert_eq!(Balance::new("1.25").amount(), 1.25);
        assert_eq!(Balance::new("not a number").amount(), 0.0);
        assert_eq!(Balance::new("").amount(), 0.0);
    }

    #[test]
    fn is_connected__follows_address_presence() {
        assert!(StaticWallet::connected("0xabc", "1").is_connected());
        assert!(!StaticWallet::disconnected().is_connected());
    }
}
