//! Operation catalog and account-history bitmask filter.

/// Protocol-assigned index for every operation type, in catalog order.
///
/// The indices feed [`make_bitmask_filter`] and double as a reference
/// catalog for callers. Fixed per hardfork; never mutated at runtime.
pub const OPERATION_ORDERS: &[(&str, u8)] = &[
    ("vote", 0),
    ("comment", 1),
    ("transfer", 2),
    ("transfer_to_vesting", 3),
    ("withdraw_vesting", 4),
    ("limit_order_create", 5),
    ("limit_order_cancel", 6),
    ("feed_publish", 7),
    ("convert", 8),
    ("account_create", 9),
    ("account_update", 10),
    ("witness_update", 11),
    ("account_witness_vote", 12),
    ("account_witness_proxy", 13),
    ("pow", 14),
    ("custom", 15),
    ("report_over_production", 16),
    ("delete_comment", 17),
    ("custom_json", 18),
    ("comment_options", 19),
    ("set_withdraw_vesting_route", 20),
    ("limit_order_create2", 21),
    ("claim_account", 22),
    ("create_claimed_account", 23),
    ("request_account_recovery", 24),
    ("recover_account", 25),
    ("change_recovery_account", 26),
    ("escrow_transfer", 27),
    ("escrow_dispute", 28),
    ("escrow_release", 29),
    ("pow2", 30),
    ("escrow_approve", 31),
    ("transfer_to_savings", 32),
    ("transfer_from_savings", 33),
    ("cancel_transfer_from_savings", 34),
    ("custom_binary", 35),
    ("decline_voting_rights", 36),
    ("reset_account", 37),
    ("set_reset_account", 38),
    ("claim_reward_balance", 39),
    ("delegate_vesting_shares", 40),
    ("account_create_with_delegation", 41),
    ("witness_set_properties", 42),
    ("account_update2", 43),
    ("create_proposal", 44),
    ("update_proposal_votes", 45),
    ("remove_proposal", 46),
    ("update_proposal", 47),
    ("fill_convert_request", 48),
    ("author_reward", 49),
    ("curation_reward", 50),
    ("comment_reward", 51),
    ("liquidity_reward", 52),
    ("interest", 53),
    ("fill_vesting_withdraw", 54),
    ("fill_order", 55),
    ("shutdown_witness", 56),
    ("fill_transfer_from_savings", 57),
    ("hardfork", 58),
    ("comment_payout_update", 59),
    ("return_vesting_delegation", 60),
    ("comment_benefactor_reward", 61),
    ("producer_reward", 62),
    ("clear_null_account_balance", 63),
    ("proposal_pay", 64),
    ("sps_fund", 65),
    ("hardfork_hive", 66),
    ("hardfork_hive_restore", 67),
    ("delayed_voting", 68),
    ("consolidate_treasury_balance", 69),
    ("effective_comment_vote", 70),
    ("ineffective_delete_comment", 71),
    ("sps_convert", 72),
];

/// Look up an operation's catalog index by name.
pub fn operation_order(name: &str) -> Option<u8> {
    OPERATION_ORDERS
        .iter()
        .find(|(op, _)| *op == name)
        .map(|&(_, index)| index)
}

/// Build the two-part bitmask filter for `get_account_history`.
///
/// Bit `i` of the low half (`i < 64`) or bit `i - 64` of the high half is
/// set iff index `i` appears in `indices`. Each half is rendered as a
/// decimal string when non-zero; `None` tells the server "no filter on
/// this half", not "exclude everything". Indices ≥ 128 are silently
/// dropped — the catalog tops out well below that, and the server only
/// reads two 64-bit words.
pub fn make_bitmask_filter(indices: &[u32]) -> (Option<String>, Option<String>) {
    let (low, high) = indices.iter().fold((0u64, 0u64), |(low, high), &i| {
        if i < 64 {
            (low | 1 << i, high)
        } else if i < 128 {
            (low, high | 1 << (i - 64))
        } else {
            (low, high)
        }
    });
    let render = |half: u64| (half != 0).then(|| half.to_string());
    (render(low), render(high))
}
