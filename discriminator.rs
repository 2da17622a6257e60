//! Anchor discriminator utilities and the program's opcode table.
//!
//! Provides both static (precomputed) and dynamic (runtime) discriminator
//! calculation. The precomputed constants are what the builders emit; the
//! runtime functions exist so tests can prove every constant still matches
//! `sha256("global:<name>")[..8]`.
//!
//! ⚠️ The opcode names are the program's instruction names. Renaming one on
//! either side silently produces transactions the program rejects.

use sha2::{Digest, Sha256};

/// Compute Anchor instruction discriminator: sha256("global:<name>")[0..8]
///
/// # Example
///
/// ```
/// use parimutuel_codec::instruction_discriminator;
///
/// assert_eq!(
///     instruction_discriminator("place_bet_sol"),
///     parimutuel_codec::discriminator::PLACE_BET_SOL
/// );
/// ```
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    hashed_prefix(&format!("global:{}", name))
}

/// Compute Anchor account discriminator: sha256("account:<TypeName>")[0..8]
pub fn account_discriminator(type_name: &str) -> [u8; 8] {
    hashed_prefix(&format!("account:{}", type_name))
}

fn hashed_prefix(preimage: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(preimage.as_bytes());
    let hash_result = hasher.finalize();
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash_result[..8]);
    discriminator
}

macro_rules! opcodes {
    ($($variant:ident => $name:literal, $constant:ident = $bytes:expr;)+) => {
        $(
            #[doc = concat!("`global:", $name, "`")]
            pub const $constant: [u8; 8] = $bytes;
        )+

        /// Every instruction this crate can encode.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Opcode {
            $($variant,)+
        }

        impl Opcode {
            pub const ALL: &'static [Opcode] = &[$(Opcode::$variant,)+];

            /// The program's snake_case instruction name
            pub fn name(self) -> &'static str {
                match self {
                    $(Opcode::$variant => $name,)+
                }
            }

            pub fn discriminator(self) -> [u8; 8] {
                match self {
                    $(Opcode::$variant => $constant,)+
                }
            }

            pub fn from_discriminator(bytes: &[u8; 8]) -> Option<Opcode> {
                match *bytes {
                    $($constant => Some(Opcode::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

opcodes! {
    CreateLabMarketSol => "create_lab_market_sol", CREATE_LAB_MARKET_SOL = [35, 159, 50, 67, 31, 134, 199, 157];
    CreatePrivateMarketSol => "create_private_market_sol", CREATE_PRIVATE_MARKET_SOL = [107, 104, 218, 173, 81, 118, 167, 67];
    PlaceBetSol => "place_bet_sol", PLACE_BET_SOL = [137, 137, 247, 253, 233, 243, 48, 170];
    PlaceBetSolWithAffiliate => "place_bet_sol_with_affiliate", PLACE_BET_SOL_WITH_AFFILIATE = [197, 186, 187, 145, 252, 239, 101, 96];
    ClaimWinningsSol => "claim_winnings_sol", CLAIM_WINNINGS_SOL = [64, 158, 207, 116, 128, 129, 169, 76];
    ClaimRefundSol => "claim_refund_sol", CLAIM_REFUND_SOL = [8, 82, 5, 144, 194, 114, 255, 20];
    ClaimAffiliateSol => "claim_affiliate_sol", CLAIM_AFFILIATE_SOL = [125, 18, 164, 112, 216, 207, 197, 201];
    RegisterAffiliate => "register_affiliate", REGISTER_AFFILIATE = [87, 121, 99, 184, 126, 63, 103, 217];
    ToggleAffiliate => "toggle_affiliate", TOGGLE_AFFILIATE = [47, 161, 133, 19, 172, 44, 43, 194];
    ProposeResolution => "propose_resolution", PROPOSE_RESOLUTION = [19, 68, 181, 23, 194, 146, 152, 252];
    ResolveMarket => "resolve_market", RESOLVE_MARKET = [155, 23, 80, 173, 46, 74, 23, 239];
    FinalizeResolution => "finalize_resolution", FINALIZE_RESOLUTION = [191, 74, 94, 214, 45, 150, 152, 125];
    FlagDispute => "flag_dispute", FLAG_DISPUTE = [150, 222, 78, 72, 117, 140, 2, 75];
    VoteCouncil => "vote_council", VOTE_COUNCIL = [252, 167, 165, 182, 221, 242, 174, 249];
    AddToWhitelist => "add_to_whitelist", ADD_TO_WHITELIST = [157, 211, 52, 54, 144, 81, 5, 55];
    RemoveFromWhitelist => "remove_from_whitelist", REMOVE_FROM_WHITELIST = [7, 144, 216, 239, 243, 236, 193, 235];
    CreateCreatorProfile => "create_creator_profile", CREATE_CREATOR_PROFILE = [139, 244, 127, 145, 95, 172, 140, 154];
    UpdateCreatorProfile => "update_creator_profile", UPDATE_CREATOR_PROFILE = [8, 240, 162, 55, 110, 46, 177, 108];
    ClaimCreatorSol => "claim_creator_sol", CLAIM_CREATOR_SOL = [21, 25, 164, 47, 81, 156, 199, 103];
    CloseMarket => "close_market", CLOSE_MARKET = [88, 154, 248, 186, 48, 14, 123, 244];
    ExtendMarket => "extend_market", EXTEND_MARKET = [105, 89, 206, 205, 57, 31, 153, 252];
    CancelMarket => "cancel_market", CANCEL_MARKET = [205, 121, 84, 210, 222, 71, 150, 11];
    CreateRaceMarketSol => "create_race_market_sol", CREATE_RACE_MARKET_SOL = [94, 237, 40, 47, 63, 233, 25, 67];
    BetOnRaceOutcomeSol => "bet_on_race_outcome_sol", BET_ON_RACE_OUTCOME_SOL = [195, 181, 151, 159, 105, 100, 234, 244];
    BetOnRaceOutcomeSolWithAffiliate => "bet_on_race_outcome_sol_with_affiliate", BET_ON_RACE_OUTCOME_SOL_WITH_AFFILIATE = [26, 224, 14, 181, 67, 52, 24, 0];
    ClaimRaceWinningsSol => "claim_race_winnings_sol", CLAIM_RACE_WINNINGS_SOL = [46, 120, 202, 194, 126, 72, 22, 52];
    ClaimRaceRefundSol => "claim_race_refund_sol", CLAIM_RACE_REFUND_SOL = [159, 153, 234, 136, 43, 79, 219, 152];
    ProposeRaceResolution => "propose_race_resolution", PROPOSE_RACE_RESOLUTION = [14, 204, 17, 188, 243, 49, 107, 255];
    ResolveRace => "resolve_race", RESOLVE_RACE = [181, 252, 7, 209, 242, 100, 95, 172];
    FinalizeRaceResolution => "finalize_race_resolution", FINALIZE_RACE_RESOLUTION = [19, 232, 81, 138, 191, 218, 54, 200];
    FlagRaceDispute => "flag_race_dispute", FLAG_RACE_DISPUTE = [154, 160, 110, 29, 65, 3, 77, 7];
    VoteCouncilRace => "vote_council_race", VOTE_COUNCIL_RACE = [79, 176, 145, 193, 225, 24, 183, 234];
    AddToRaceWhitelist => "add_to_race_whitelist", ADD_TO_RACE_WHITELIST = [144, 229, 112, 184, 199, 39, 27, 156];
    RemoveFromRaceWhitelist => "remove_from_race_whitelist", REMOVE_FROM_RACE_WHITELIST = [150, 136, 17, 158, 48, 19, 39, 232];
    CloseRaceMarket => "close_race_market", CLOSE_RACE_MARKET = [39, 189, 166, 118, 134, 37, 102, 41];
    ExtendRaceMarket => "extend_race_market", EXTEND_RACE_MARKET = [242, 176, 227, 152, 79, 116, 110, 168];
    CancelRace => "cancel_race", CANCEL_RACE = [223, 214, 232, 232, 43, 15, 165, 234];
}

/// `account:Market`
pub const MARKET_ACCOUNT: [u8; 8] = [219, 190, 213, 55, 0, 227, 198, 154];
/// `account:RaceMarket`
pub const RACE_MARKET_ACCOUNT: [u8; 8] = [235, 196, 111, 75, 230, 113, 118, 238];
/// `account:Config`
pub const CONFIG_ACCOUNT: [u8; 8] = [155, 12, 170, 224, 30, 250, 204, 130];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_constants_match_hashes() {
        for opcode in Opcode::ALL {
            assert_eq!(
                opcode.discriminator(),
                instruction_discriminator(opcode.name()),
                "stale discriminator for {}",
                opcode.name()
            );
        }
        assert_eq!(MARKET_ACCOUNT, account_discriminator("Market"));
        assert_eq!(RACE_MARKET_ACCOUNT, account_discriminator("RaceMarket"));
        assert_eq!(CONFIG_ACCOUNT, account_discriminator("Config"));
    }

    #[test]
    fn test_no_duplicate_discriminators() {
        let unique: HashSet<[u8; 8]> = Opcode::ALL.iter().map(|op| op.discriminator()).collect();
        assert_eq!(unique.len(), Opcode::ALL.len());
    }

    #[test]
    fn test_from_discriminator() {
        assert_eq!(
            Opcode::from_discriminator(&PLACE_BET_SOL),
            Some(Opcode::PlaceBetSol)
        );
        assert_eq!(Opcode::from_discriminator(&[0u8; 8]), None);
    }
}
