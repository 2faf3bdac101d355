use crate::{
    chain::ChainFamily,
    error::{SdkError, SdkResult},
};

// 0x-prefixed, 20 bytes of hex
pub fn is_valid_evm_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(body) if body.len() == 40 => hex::decode(body).is_ok(),
        _ => false,
    }
}

// base58 encoding of a 32-byte public key
pub fn is_valid_solana_address(address: &str) -> bool {
    match bs58::decode(address).into_vec() {
        Ok(bytes) => bytes.len() == 32,
        Err(_) => false,
    }
}

pub fn validate_address(family: ChainFamily, address: &str) -> SdkResult<()> {
    let valid = match family {
        ChainFamily::Evm => is_valid_evm_address(address),
        ChainFamily::Solana => is_valid_solana_address(address),
    };
    if valid {
        Ok(())
    } else {
        Err(SdkError::InvalidAddress {
            family: family.to_string(),
            address: address.to_string(),
        })
    }
}
