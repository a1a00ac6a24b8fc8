pub mod persisted_form;
