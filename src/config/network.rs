//! Payment parameters per EVM network.

use crate::error::ConfigError;

/// RPC endpoint and payment token for one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoutNetwork {
    pub rpc: &'static str,
    pub payment_token: &'static str,
}

const PAYOUT_NETWORKS: &[(u64, PayoutNetwork)] = &[
    (
        1,
        PayoutNetwork {
            rpc: "https://rpc-bot.ubq.fi/v1/mainnet",
            // DAI
            payment_token: "0x6B175474E89094C44Da98b954EedeAC495271d0F",
        },
    ),
    (
        100,
        PayoutNetwork {
            rpc: "https://rpc.gnosischain.com",
            // WXDAI
            payment_token: "0xe91D153E0b41518A2Ce8Dd3D7944Fa863463a97d",
        },
    ),
];

/// Look up payment parameters for `network_id`.
pub fn payout_config_by_network_id(network_id: u64) -> Result<PayoutNetwork, ConfigError> {
    PAYOUT_NETWORKS
        .iter()
        .find(|(id, _)| *id == network_id)
        .map(|(_, network)| *network)
        .ok_or(ConfigError::UnknownNetwork(network_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_networks_resolve() {
        let gnosis = payout_config_by_network_id(100).unwrap();
        assert_eq!(gnosis.rpc, "https://rpc.gnosischain.com");

        let mainnet = payout_config_by_network_id(1).unwrap();
        assert!(mainnet.payment_token.starts_with("0x6B17"));
    }

    #[test]
    fn unknown_network_is_config_error() {
        assert!(matches!(
            payout_config_by_network_id(5),
            Err(ConfigError::UnknownNetwork(5))
        ));
    }
}
