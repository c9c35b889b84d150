use std::time::Duration;

use api_types::customer::{CustomerNew, CustomerView};
use api_types::transaction::TransactionView;
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent};
use uuid::Uuid;

use crate::{
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    form::TransactionForm,
    receipt, ui,
    ui::keymap::AppAction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Customers,
    CustomerForm,
    Detail,
    TransactionForm,
    Receipt,
    ConfirmDelete,
}

/// Customer entry fields, tabbed through in order. Doubles as the edit
/// form when `editing` is set.
#[derive(Debug, Default)]
pub struct CustomerFormState {
    pub editing: Option<Uuid>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub location: String,
    pub county: String,
    pub focus: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

pub const CUSTOMER_FIELD_COUNT: usize = 5;

impl CustomerFormState {
    pub fn field_mut(&mut self, index: usize) -> &mut String {
        match index {
            0 => &mut self.name,
            1 => &mut self.phone,
            2 => &mut self.email,
            3 => &mut self.location,
            _ => &mut self.county,
        }
    }

    pub fn field(&self, index: usize) -> &String {
        match index {
            0 => &self.name,
            1 => &self.phone,
            2 => &self.email,
            3 => &self.location,
            _ => &self.county,
        }
    }

    fn for_edit(customer: &CustomerView) -> Self {
        Self {
            editing: Some(customer.id),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            email: customer.email.clone().unwrap_or_default(),
            location: customer.location.clone(),
            county: customer.county.clone(),
            ..Self::default()
        }
    }

    fn body(&self) -> CustomerNew {
        CustomerNew {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: (!self.email.trim().is_empty()).then(|| self.email.trim().to_string()),
            location: self.location.clone(),
            county: self.county.clone(),
            address: None,
            category: None,
        }
    }
}

/// Typed-name confirmation for customer deletion.
#[derive(Debug, Default)]
pub struct ConfirmDeleteState {
    pub typed: String,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct DetailState {
    pub customer: CustomerView,
    pub transactions: Vec<TransactionView>,
    pub selected: usize,
    /// Result of checking the stored aggregates against the server's live
    /// re-aggregation endpoint.
    pub consistency: Option<String>,
}

impl DetailState {
    pub fn selected_transaction(&self) -> Option<&TransactionView> {
        self.transactions.get(self.selected)
    }

    fn select_next(&mut self) {
        if !self.transactions.is_empty() {
            self.selected = (self.selected + 1).min(self.transactions.len() - 1);
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

pub struct AppState {
    pub screen: Screen,
    pub customers: Vec<CustomerView>,
    pub selected: usize,
    pub detail: Option<DetailState>,
    pub customer_form: CustomerFormState,
    pub form: TransactionForm,
    pub confirm: ConfirmDeleteState,
    pub receipt_text: Option<String>,
    pub toast: Option<String>,
    pub timezone: Tz,
}

pub struct App {
    client: Client,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url, config.token.clone())?;
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|_| AppError::Terminal(format!("invalid timezone: {}", config.timezone)))?;

        Ok(Self {
            client,
            state: AppState {
                screen: Screen::Customers,
                customers: Vec::new(),
                selected: 0,
                detail: None,
                customer_form: CustomerFormState::default(),
                form: TransactionForm::default(),
                confirm: ConfirmDeleteState::default(),
                receipt_text: None,
                toast: None,
                timezone,
            },
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.refresh_customers().await;

        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await?,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let action = ui::keymap::map_key(key);
        if action == AppAction::ForceQuit {
            self.should_quit = true;
            return Ok(());
        }

        match self.state.screen {
            Screen::Customers => self.handle_customers_key(action).await,
            Screen::CustomerForm => self.handle_customer_form_key(action).await,
            Screen::Detail => self.handle_detail_key(action).await,
            Screen::TransactionForm => self.handle_form_key(action).await,
            Screen::Receipt => {
                if matches!(action, AppAction::Cancel | AppAction::Submit) {
                    self.state.receipt_text = None;
                    self.state.screen = Screen::Detail;
                }
                Ok(())
            }
            Screen::ConfirmDelete => self.handle_confirm_key(action).await,
        }
    }

    async fn handle_customers_key(&mut self, action: AppAction) -> Result<()> {
        match action {
            AppAction::Cancel => self.should_quit = true,
            AppAction::Up => self.state.selected = self.state.selected.saturating_sub(1),
            AppAction::Down => {
                if !self.state.customers.is_empty() {
                    self.state.selected =
                        (self.state.selected + 1).min(self.state.customers.len() - 1);
                }
            }
            AppAction::Submit => {
                if let Some(customer) = self.state.customers.get(self.state.selected) {
                    let id = customer.id;
                    self.open_detail(id).await;
                }
            }
            AppAction::Input('q') => self.should_quit = true,
            AppAction::Input('n') => {
                self.state.customer_form = CustomerFormState::default();
                self.state.screen = Screen::CustomerForm;
            }
            AppAction::Input('r') => self.refresh_customers().await,
            _ => {}
        }
        Ok(())
    }

    async fn handle_customer_form_key(&mut self, action: AppAction) -> Result<()> {
        match action {
            AppAction::Cancel => {
                self.state.screen = if self.state.customer_form.editing.is_some() {
                    Screen::Detail
                } else {
                    Screen::Customers
                };
            }
            AppAction::NextField => {
                self.state.customer_form.focus =
                    (self.state.customer_form.focus + 1) % CUSTOMER_FIELD_COUNT;
            }
            AppAction::PrevField => {
                self.state.customer_form.focus = (self.state.customer_form.focus
                    + CUSTOMER_FIELD_COUNT
                    - 1)
                    % CUSTOMER_FIELD_COUNT;
            }
            AppAction::Submit => self.submit_customer_form().await,
            AppAction::Backspace => {
                let focus = self.state.customer_form.focus;
                self.state.customer_form.field_mut(focus).pop();
            }
            AppAction::Input(ch) => {
                let focus = self.state.customer_form.focus;
                self.state.customer_form.field_mut(focus).push(ch);
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_detail_key(&mut self, action: AppAction) -> Result<()> {
        match action {
            AppAction::Cancel => {
                self.state.detail = None;
                self.state.screen = Screen::Customers;
            }
            AppAction::Up => {
                if let Some(detail) = &mut self.state.detail {
                    detail.select_prev();
                }
            }
            AppAction::Down => {
                if let Some(detail) = &mut self.state.detail {
                    detail.select_next();
                }
            }
            AppAction::Submit | AppAction::Input('v') => self.open_receipt(),
            AppAction::Input('a') => {
                if let Some(detail) = &self.state.detail {
                    self.state.form = TransactionForm::for_customer(detail.customer.id);
                    self.state.screen = Screen::TransactionForm;
                }
            }
            AppAction::Input('e') => {
                if let Some(detail) = &self.state.detail
                    && let Some(tx) = detail.selected_transaction()
                {
                    self.state.form = TransactionForm::for_edit(detail.customer.id, tx);
                    self.state.screen = Screen::TransactionForm;
                }
            }
            AppAction::Input('x') => self.delete_selected_transaction().await,
            AppAction::Input('u') => {
                if let Some(detail) = &self.state.detail {
                    self.state.customer_form = CustomerFormState::for_edit(&detail.customer);
                    self.state.screen = Screen::CustomerForm;
                }
            }
            AppAction::Input('d') => {
                if self.state.detail.is_some() {
                    self.state.confirm = ConfirmDeleteState::default();
                    self.state.screen = Screen::ConfirmDelete;
                }
            }
            AppAction::Input('r') => self.refresh_detail().await,
            AppAction::Input('q') => self.should_quit = true,
            _ => {}
        }
        Ok(())
    }

    async fn handle_form_key(&mut self, action: AppAction) -> Result<()> {
        match action {
            AppAction::Cancel => {
                if !self.state.form.is_submitting() {
                    self.state.screen = Screen::Detail;
                }
            }
            AppAction::NextField => self.state.form.next_field(),
            AppAction::PrevField => self.state.form.prev_field(),
            AppAction::Backspace => self.state.form.backspace(),
            AppAction::Submit => self.submit_transaction_form().await,
            AppAction::Input(ch) => {
                // Quick actions live on letter keys; numeric fields reject
                // letters anyway, so they are only ambiguous in notes.
                if self.state.form.focus != crate::form::NOTES_FIELD {
                    match ch {
                        'f' => self.state.form.quick_fill_full(),
                        'h' => self.state.form.quick_fill_half(),
                        'n' => self.state.form.quick_fill_none(),
                        'g' => self.state.form.autofill_load(),
                        'p' => self.state.form.cycle_payment_method(),
                        _ => self.state.form.input_char(ch),
                    }
                } else {
                    self.state.form.input_char(ch);
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_confirm_key(&mut self, action: AppAction) -> Result<()> {
        match action {
            AppAction::Cancel => self.state.screen = Screen::Detail,
            AppAction::Backspace => {
                self.state.confirm.typed.pop();
            }
            AppAction::Input(ch) => self.state.confirm.typed.push(ch),
            AppAction::Submit => self.confirm_delete_customer().await,
            _ => {}
        }
        Ok(())
    }

    // ── Gateway calls ───────────────────────────────────────────────────

    async fn refresh_customers(&mut self) {
        match self.client.list_customers().await {
            Ok(customers) => {
                self.state.selected = self
                    .state
                    .selected
                    .min(customers.len().saturating_sub(1));
                self.state.customers = customers;
                self.state.toast = None;
            }
            Err(err) => self.state.toast = Some(err.message()),
        }
    }

    async fn open_detail(&mut self, customer_id: Uuid) {
        let customer = match self.client.customer(customer_id).await {
            Ok(customer) => customer,
            Err(err) => {
                self.state.toast = Some(err.message());
                return;
            }
        };
        match self.client.list_transactions(customer_id, 100).await {
            Ok(transactions) => {
                self.state.detail = Some(DetailState {
                    customer,
                    transactions,
                    selected: 0,
                    consistency: None,
                });
                self.state.screen = Screen::Detail;
                self.state.toast = None;
            }
            Err(err) => self.state.toast = Some(err.message()),
        }
    }

    /// Reloads the detail view and cross-checks the stored aggregates
    /// against the server's live re-aggregation.
    async fn refresh_detail(&mut self) {
        let Some(customer_id) = self.state.detail.as_ref().map(|d| d.customer.id) else {
            return;
        };
        self.open_detail(customer_id).await;

        let Some(detail) = &mut self.state.detail else {
            return;
        };
        match self.client.customer_balances(customer_id).await {
            Ok(balances) => {
                let customer = &detail.customer;
                let consistent = balances.financial_balance == customer.financial_balance
                    && balances.total_billed == customer.total_billed
                    && balances.total_paid == customer.total_paid
                    && balances.cylinder_balance == customer.cylinder_balance;
                detail.consistency = Some(if consistent {
                    "aggregates match server recomputation".to_string()
                } else {
                    "WARNING: stored aggregates differ from recomputation".to_string()
                });
            }
            Err(err) => detail.consistency = Some(err.message()),
        }
    }

    async fn submit_customer_form(&mut self) {
        if self.state.customer_form.submitting {
            return;
        }
        let name = self.state.customer_form.name.trim().to_string();
        let phone = self.state.customer_form.phone.trim().to_string();
        if name.is_empty() {
            self.state.customer_form.error = Some("Name is required.".to_string());
            return;
        }
        if phone.is_empty() {
            self.state.customer_form.error = Some("Phone is required.".to_string());
            return;
        }

        self.state.customer_form.submitting = true;
        let body = self.state.customer_form.body();
        let result = match self.state.customer_form.editing {
            Some(customer_id) => self.client.update_customer(customer_id, &body).await,
            None => self.client.create_customer(&body).await,
        };
        match result {
            Ok(customer) => {
                let edited = self.state.customer_form.editing.is_some();
                self.state.customer_form = CustomerFormState::default();
                self.state.toast = Some(format!("Customer {} saved", customer.name));
                if edited {
                    self.open_detail(customer.id).await;
                } else {
                    self.refresh_customers().await;
                    self.state.screen = Screen::Customers;
                }
            }
            Err(err) => {
                self.state.customer_form.submitting = false;
                self.state.customer_form.error = Some(err.message());
            }
        }
    }

    async fn submit_transaction_form(&mut self) {
        let Some(body) = self.state.form.begin_submit() else {
            return;
        };

        let result = match self.state.form.editing {
            Some(tx_id) => self.client.update_transaction(tx_id, &body).await,
            None => self.client.create_transaction(&body).await,
        };

        match result {
            Ok(saved) => {
                self.state.form.submit_succeeded();
                self.state.toast = Some(format!(
                    "Saved {} ({})",
                    saved.transaction_number.as_deref().unwrap_or("transaction"),
                    engine::Money::from_cents(saved.total_bill)
                ));
                self.refresh_detail().await;
                self.state.screen = Screen::Detail;
            }
            Err(err) => self.state.form.submit_failed(err.message()),
        }
    }

    async fn delete_selected_transaction(&mut self) {
        let Some(tx_id) = self
            .state
            .detail
            .as_ref()
            .and_then(|d| d.selected_transaction())
            .map(|tx| tx.id)
        else {
            return;
        };
        match self.client.delete_transaction(tx_id).await {
            Ok(()) => {
                self.state.toast = Some("Transaction deleted".to_string());
                self.refresh_detail().await;
            }
            Err(err) => self.state.toast = Some(err.message()),
        }
    }

    async fn confirm_delete_customer(&mut self) {
        let Some(detail) = &self.state.detail else {
            return;
        };
        let customer = &detail.customer;
        if self.state.confirm.typed != customer.name {
            self.state.confirm.error = Some(format!(
                "Type the customer's exact name (\"{}\") to confirm.",
                customer.name
            ));
            return;
        }

        let id = customer.id;
        match self.client.delete_customer(id, true).await {
            Ok(()) => {
                self.state.toast = Some("Customer and their transactions deleted".to_string());
                self.state.detail = None;
                self.state.screen = Screen::Customers;
                self.refresh_customers().await;
            }
            Err(err) => self.state.confirm.error = Some(err.message()),
        }
    }

    fn open_receipt(&mut self) {
        if let Some(detail) = &self.state.detail
            && let Some(tx) = detail.selected_transaction()
        {
            self.state.receipt_text =
                Some(receipt::render(&detail.customer, tx, self.state.timezone));
            self.state.screen = Screen::Receipt;
        }
    }
}
