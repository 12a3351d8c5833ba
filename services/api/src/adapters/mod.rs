pub mod file_store;
pub mod instruction_llm;
pub mod payment;
pub mod suggestion_llm;

pub use file_store::FileStore;
pub use instruction_llm::OpenAiInstructionAdapter;
pub use payment::SimulatedPaymentProvider;
pub use suggestion_llm::OpenAiSuggestionAdapter;
