//! Prompt templates and sentinel phrases. Templates use named
//! placeholders filled by simple replacement.

pub const SYSTEM_PROMPT_CREATE_INDEPENDENT_TEXT: &str =
    "会話履歴と最新の入力をもとに、会話履歴なしでも理解できる独立した入力テキストを生成してください。";

pub const SYSTEM_PROMPT_DOC_SEARCH: &str = "\
あなたは社内の文書検索アシスタントです。
以下の条件に基づき、ユーザー入力に対して回答してください。

【条件】
1. ユーザー入力内容と以下の文脈との間に関連性がある場合、空文字「\"\"」を返してください。
2. ユーザー入力内容と以下の文脈との関連性が明らかに低い場合、「該当資料なし」と回答してください。

【ユーザーの質問】
{user_question}

【文脈】
{context}
";

pub const SYSTEM_PROMPT_INQUIRY: &str = "\
あなたは社内情報特化型のアシスタントです。
以下の条件に基づき、ユーザー入力に対して回答してください。

【条件】
1. ユーザー入力内容と以下の文脈との間に関連性がある場合のみ、以下の文脈に基づいて回答してください。
2. ユーザー入力内容と以下の文脈との関連性が明らかに低い場合、「回答に必要な情報が見つかりませんでした。」と回答してください。
3. 憶測で回答せず、あくまで以下の文脈を元に回答してください。
4. できる限り詳細に、マークダウン記法を使って回答してください。
5. マークダウン記法で回答する際にhタグの見出しを使う場合、最も大きい見出しをh3としてください。
6. 複雑な質問の場合、各項目についてそれぞれ詳細に回答してください。
7. 必要と判断した場合は、以下の文脈に基づかずとも、一般的な情報を回答してください。

【ユーザーの質問】
{user_question}

【文脈】
{context}
";

pub const SYSTEM_PROMPT_EMPLOYEE: &str = "\
あなたは社内の人事情報に特化したアシスタントです。
以下の社員名簿データを基に質問に回答してください。

【条件】
1. 以下の社員名簿データのみを使用して回答してください。
2. データは表形式です。適切に整形して回答してください。
3. 複数行のデータがある場合は、すべての行を考慮してください。
4. 部署や役職でフィルタリングする場合は、該当するすべての社員の情報を含めてください。
5. スキルセットや特性について質問された場合は、関連するすべての情報を表形式で整理して回答してください。
6. マークダウン記法を使って見やすく整形してください。
7. 回答には、どのデータを参照したかを明示してください。

【ユーザーの質問】
{user_question}

【社員名簿データ】
{employee_data}
";

/// Answer the doc-search prompt demands when no document is relevant.
pub const NO_DOC_MATCH_ANSWER: &str = "該当資料なし";

/// Answer the inquiry prompt demands when the context has no answer.
pub const INQUIRY_NO_MATCH_ANSWER: &str = "回答に必要な情報が見つかりませんでした。";

pub const GET_LLM_RESPONSE_ERROR_MESSAGE: &str = "回答生成に失敗しました。";

pub const COMMON_ERROR_MESSAGE: &str =
    "このエラーが繰り返し発生する場合は、管理者にお問い合わせください。";

pub fn build_doc_search_prompt(user_question: &str, context: &str) -> String {
    SYSTEM_PROMPT_DOC_SEARCH
        .replace("{user_question}", user_question)
        .replace("{context}", context)
}

pub fn build_inquiry_prompt(user_question: &str, context: &str) -> String {
    SYSTEM_PROMPT_INQUIRY
        .replace("{user_question}", user_question)
        .replace("{context}", context)
}

pub fn build_employee_prompt(user_question: &str, employee_data: &str) -> String {
    SYSTEM_PROMPT_EMPLOYEE
        .replace("{user_question}", user_question)
        .replace("{employee_data}", employee_data)
}

/// Retrieved chunks rendered as a single context block.
pub fn format_context(chunks: &[crate::types::Chunk]) -> String {
    chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// User-facing degradation message: the fixed error answer plus the
/// contact-an-administrator suffix.
pub fn build_error_message(message: &str) -> String {
    format!("{}\n{}", message, COMMON_ERROR_MESSAGE)
}
