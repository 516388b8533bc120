//! Persistence seam.
//!
//! `Store` is the trait every component talks to; its methods read and write
//! whole rows the way a real database client would, so swapping the
//! in-process reference implementation for a networked RDBMS never touches
//! ledger/inventory/pipeline code. [`InProcessStore`] is that reference
//! implementation: every table is a `BTreeMap` owned directly behind typed
//! accessor methods, with ascending-key iteration giving the same canonical
//! lock order a real multi-row transaction would use.
//!
//! A single draw request locks the whole store (via the `Mutex` the
//! orchestrator wraps it in) for the duration of its transactional envelope;
//! that lock is this reference backend's literal equivalent of the row
//! locks a networked database would take instead.

use std::collections::BTreeMap;

use crate::events::{Event, EventLog};
use crate::models::{
    Account, AccountType, AssetBalance, AssetTransaction, BudgetDebt, DrawDecision, FairnessCounters,
    GlobalFairnessCounters, IdempotencyRecord, InventoryDebt, ItemInstance, LotteryCampaign, LotteryPrize,
    OverrideDirective, PresetQueueEntry,
};

/// Persistence seam every component depends on instead of concrete storage.
pub trait Store: Send {
    fn get_or_create_account(&mut self, owner_user_id: Option<u64>, account_type: AccountType) -> Account;
    fn get_account(&self, account_id: u64) -> Option<Account>;

    /// Returns a zeroed row on first access rather than `None`, mirroring
    /// the ledger's own "upsert on first credit" rule.
    fn get_balance(&mut self, account_id: u64, asset_code: &str) -> AssetBalance;
    fn put_balance(&mut self, balance: AssetBalance);

    fn append_transaction(&mut self, transaction: AssetTransaction);
    fn next_transaction_id(&mut self) -> u64;

    fn get_campaign(&self, campaign_id: u64) -> Option<LotteryCampaign>;
    fn get_campaign_by_code(&self, code: &str) -> Option<LotteryCampaign>;
    fn put_campaign(&mut self, campaign: LotteryCampaign);

    fn get_prize(&self, prize_id: u64) -> Option<LotteryPrize>;
    fn put_prize(&mut self, prize: LotteryPrize);
    fn prizes_for_campaign(&self, campaign_id: u64) -> Vec<LotteryPrize>;

    fn mint_item_instance(&mut self, template_id: u64, holder_user_id: u64) -> ItemInstance;
    fn put_item_instance(&mut self, instance: ItemInstance);
    fn next_instance_id(&mut self) -> u64;

    fn append_draw_decision(&mut self, decision: DrawDecision);
    fn next_draw_id(&mut self) -> u64;

    /// Claims (consumes) the lowest unconsumed `seq` entry for `campaign_id`,
    /// falling back to the global (`campaign_id = None`) queue if the
    /// campaign-specific one is empty.
    fn claim_preset_entry(&mut self, campaign_id: u64, now: i64) -> Option<PresetQueueEntry>;
    fn put_preset_entry(&mut self, entry: PresetQueueEntry);

    /// Returns directives active `valid_from <= now < expires_at` for this
    /// (user, campaign) pair, consuming any single-use match in the same call.
    fn claim_active_directives(&mut self, user_id: u64, campaign_id: u64, now: i64) -> Vec<OverrideDirective>;
    fn put_override_directive(&mut self, directive: OverrideDirective);

    fn get_inventory_debt(&mut self, campaign_id: u64, prize_id: u64) -> InventoryDebt;
    fn put_inventory_debt(&mut self, debt: InventoryDebt);

    fn get_budget_debt(&mut self, campaign_id: u64) -> BudgetDebt;
    fn put_budget_debt(&mut self, debt: BudgetDebt);

    fn get_fairness_counters(&mut self, user_id: u64, campaign_id: u64) -> FairnessCounters;
    fn put_fairness_counters(&mut self, counters: FairnessCounters);

    fn get_global_fairness(&mut self, campaign_id: u64) -> GlobalFairnessCounters;
    fn put_global_fairness(&mut self, counters: GlobalFairnessCounters);

    fn get_idempotency(&self, key: &str) -> Option<IdempotencyRecord>;
    fn put_idempotency(&mut self, record: IdempotencyRecord);

    /// Every idempotency row, for the background sweeper. Not used on any
    /// per-request path.
    fn all_idempotency(&self) -> Vec<IdempotencyRecord>;
    fn delete_idempotency(&mut self, key: &str);

    fn log_event(&mut self, event: Event) -> u64;
    fn event_log(&self) -> &EventLog;
}

/// In-process reference implementation of [`Store`].
#[derive(Debug, Default)]
pub struct InProcessStore {
    accounts: BTreeMap<u64, Account>,
    next_account_id: u64,
    balances: BTreeMap<(u64, String), AssetBalance>,
    transactions: Vec<AssetTransaction>,
    next_transaction_id: u64,
    campaigns: BTreeMap<u64, LotteryCampaign>,
    campaigns_by_code: BTreeMap<String, u64>,
    prizes: BTreeMap<u64, LotteryPrize>,
    item_instances: BTreeMap<u64, ItemInstance>,
    next_instance_id: u64,
    draw_decisions: Vec<DrawDecision>,
    next_draw_id: u64,
    preset_queue: BTreeMap<(Option<u64>, u64), PresetQueueEntry>,
    override_directives: BTreeMap<u64, OverrideDirective>,
    inventory_debts: BTreeMap<(u64, u64), InventoryDebt>,
    budget_debts: BTreeMap<u64, BudgetDebt>,
    fairness_counters: BTreeMap<(u64, u64), FairnessCounters>,
    global_fairness: BTreeMap<u64, GlobalFairnessCounters>,
    idempotency: BTreeMap<String, IdempotencyRecord>,
    event_log: EventLog,
}

impl InProcessStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a campaign and its prizes directly, for test/fixture setup.
    pub fn seed_campaign(&mut self, campaign: LotteryCampaign) {
        self.campaigns_by_code.insert(campaign.code().to_string(), campaign.campaign_id());
        self.campaigns.insert(campaign.campaign_id(), campaign);
    }

    pub fn seed_prize(&mut self, prize: LotteryPrize) {
        self.prizes.insert(prize.prize_id(), prize);
    }

    pub fn seed_preset_entry(&mut self, entry: PresetQueueEntry) {
        self.preset_queue.insert((entry.campaign_id(), entry.seq()), entry);
    }

    pub fn seed_override_directive(&mut self, directive: OverrideDirective) {
        self.override_directives.insert(directive.directive_id(), directive);
    }
}

impl Store for InProcessStore {
    fn get_or_create_account(&mut self, owner_user_id: Option<u64>, account_type: AccountType) -> Account {
        if let Some(existing) = self
            .accounts
            .values()
            .find(|a| a.owner_user_id() == owner_user_id && a.account_type() == account_type)
        {
            return existing.clone();
        }
        let id = self.next_account_id;
        self.next_account_id += 1;
        let account = Account::new(id, owner_user_id, account_type);
        self.accounts.insert(id, account.clone());
        account
    }

    fn get_account(&self, account_id: u64) -> Option<Account> {
        self.accounts.get(&account_id).cloned()
    }

    fn get_balance(&mut self, account_id: u64, asset_code: &str) -> AssetBalance {
        self.balances
            .entry((account_id, asset_code.to_string()))
            .or_insert_with(|| AssetBalance::new(account_id, asset_code.to_string()))
            .clone()
    }

    fn put_balance(&mut self, balance: AssetBalance) {
        self.balances.insert((balance.account_id(), balance.asset_code().to_string()), balance);
    }

    fn append_transaction(&mut self, transaction: AssetTransaction) {
        self.transactions.push(transaction);
    }

    fn next_transaction_id(&mut self) -> u64 {
        let id = self.next_transaction_id;
        self.next_transaction_id += 1;
        id
    }

    fn get_campaign(&self, campaign_id: u64) -> Option<LotteryCampaign> {
        self.campaigns.get(&campaign_id).cloned()
    }

    fn get_campaign_by_code(&self, code: &str) -> Option<LotteryCampaign> {
        self.campaigns_by_code.get(code).and_then(|id| self.campaigns.get(id).cloned())
    }

    fn put_campaign(&mut self, campaign: LotteryCampaign) {
        self.campaigns_by_code.insert(campaign.code().to_string(), campaign.campaign_id());
        self.campaigns.insert(campaign.campaign_id(), campaign);
    }

    fn get_prize(&self, prize_id: u64) -> Option<LotteryPrize> {
        self.prizes.get(&prize_id).cloned()
    }

    fn put_prize(&mut self, prize: LotteryPrize) {
        self.prizes.insert(prize.prize_id(), prize);
    }

    fn prizes_for_campaign(&self, campaign_id: u64) -> Vec<LotteryPrize> {
        self.prizes.values().filter(|p| p.campaign_id() == campaign_id).cloned().collect()
    }

    fn mint_item_instance(&mut self, template_id: u64, holder_user_id: u64) -> ItemInstance {
        let id = self.next_instance_id;
        self.next_instance_id += 1;
        let instance = ItemInstance::mint(id, template_id, holder_user_id);
        self.item_instances.insert(id, instance.clone());
        instance
    }

    fn put_item_instance(&mut self, instance: ItemInstance) {
        self.item_instances.insert(instance.instance_id(), instance);
    }

    fn next_instance_id(&mut self) -> u64 {
        let id = self.next_instance_id;
        self.next_instance_id += 1;
        id
    }

    fn append_draw_decision(&mut self, decision: DrawDecision) {
        self.draw_decisions.push(decision);
    }

    fn next_draw_id(&mut self) -> u64 {
        let id = self.next_draw_id;
        self.next_draw_id += 1;
        id
    }

    fn claim_preset_entry(&mut self, campaign_id: u64, now: i64) -> Option<PresetQueueEntry> {
        let key = self
            .preset_queue
            .iter()
            .filter(|((scope, _), entry)| *scope == Some(campaign_id) && !entry.is_consumed())
            .map(|(key, _)| *key)
            .next()
            .or_else(|| {
                self.preset_queue
                    .iter()
                    .filter(|((scope, _), entry)| scope.is_none() && !entry.is_consumed())
                    .map(|(key, _)| *key)
                    .next()
            });

        key.map(|key| {
            let entry = self.preset_queue.get_mut(&key).expect("key came from this map");
            entry.consume(now);
            entry.clone()
        })
    }

    fn put_preset_entry(&mut self, entry: PresetQueueEntry) {
        self.preset_queue.insert((entry.campaign_id(), entry.seq()), entry);
    }

    fn claim_active_directives(&mut self, user_id: u64, campaign_id: u64, now: i64) -> Vec<OverrideDirective> {
        let mut matched = Vec::new();
        for directive in self.override_directives.values_mut() {
            if directive.is_active_at(now) && directive.applies_to(user_id, campaign_id) {
                directive.consume_if_single_use();
                matched.push(directive.clone());
            }
        }
        matched
    }

    fn put_override_directive(&mut self, directive: OverrideDirective) {
        self.override_directives.insert(directive.directive_id(), directive);
    }

    fn get_inventory_debt(&mut self, campaign_id: u64, prize_id: u64) -> InventoryDebt {
        *self
            .inventory_debts
            .entry((campaign_id, prize_id))
            .or_insert_with(|| InventoryDebt::new(campaign_id, prize_id))
    }

    fn put_inventory_debt(&mut self, debt: InventoryDebt) {
        self.inventory_debts.insert((debt.campaign_id(), debt.prize_id()), debt);
    }

    fn get_budget_debt(&mut self, campaign_id: u64) -> BudgetDebt {
        *self.budget_debts.entry(campaign_id).or_insert_with(|| BudgetDebt::new(campaign_id))
    }

    fn put_budget_debt(&mut self, debt: BudgetDebt) {
        self.budget_debts.insert(debt.campaign_id(), debt);
    }

    fn get_fairness_counters(&mut self, user_id: u64, campaign_id: u64) -> FairnessCounters {
        *self
            .fairness_counters
            .entry((user_id, campaign_id))
            .or_insert_with(|| FairnessCounters::new(user_id, campaign_id))
    }

    fn put_fairness_counters(&mut self, counters: FairnessCounters) {
        self.fairness_counters.insert((counters.user_id(), counters.campaign_id()), counters);
    }

    fn get_global_fairness(&mut self, campaign_id: u64) -> GlobalFairnessCounters {
        *self
            .global_fairness
            .entry(campaign_id)
            .or_insert_with(|| GlobalFairnessCounters::new(campaign_id))
    }

    fn put_global_fairness(&mut self, counters: GlobalFairnessCounters) {
        self.global_fairness.insert(counters.campaign_id(), counters);
    }

    fn get_idempotency(&self, key: &str) -> Option<IdempotencyRecord> {
        self.idempotency.get(key).cloned()
    }

    fn put_idempotency(&mut self, record: IdempotencyRecord) {
        self.idempotency.insert(record.key().to_string(), record);
    }

    fn all_idempotency(&self) -> Vec<IdempotencyRecord> {
        self.idempotency.values().cloned().collect()
    }

    fn delete_idempotency(&mut self, key: &str) {
        self.idempotency.remove(key);
    }

    fn log_event(&mut self, event: Event) -> u64 {
        self.event_log.log(event)
    }

    fn event_log(&self) -> &EventLog {
        &self.event_log
    }
}
