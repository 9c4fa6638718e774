//! Prompt templates
//!
//! Templates use `${name}` placeholders, filled by [`ChatPrompt::render`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::domain::department::Department;
use crate::domain::routing::QueryDomain;
use crate::domain::{DomainError, Message};

static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{(\w+)\}").expect("placeholder pattern is valid"));

/// A system and human message pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: &'static str,
    pub human: &'static str,
}

impl ChatPrompt {
    pub const fn new(system: &'static str, human: &'static str) -> Self {
        Self { system, human }
    }

    /// Fill placeholders in both messages; every placeholder must have a value
    pub fn render(&self, vars: &[(&str, &str)]) -> Result<Vec<Message>, DomainError> {
        Ok(vec![
            Message::system(substitute(self.system, vars)?),
            Message::user(substitute(self.human, vars)?),
        ])
    }
}

/// Single pass, so placeholders inside substituted values stay literal
fn substitute(template: &str, vars: &[(&str, &str)]) -> Result<String, DomainError> {
    let mut missing = Vec::new();

    let rendered = PLACEHOLDER_PATTERN.replace_all(template, |caps: &Captures<'_>| {
        let name = &caps[1];
        match vars.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => value.to_string(),
            None => {
                missing.push(name.to_string());
                caps[0].to_string()
            }
        }
    });

    if !missing.is_empty() {
        return Err(DomainError::internal(format!(
            "Missing prompt variable(s): {}",
            missing.join(", ")
        )));
    }

    Ok(rendered.into_owned())
}

pub const QUERY_FILTER: ChatPrompt = ChatPrompt::new(
    "당신은 질문이 부적절하거나 사회적으로 민감한 내용을 포함하는지 판단하는 필터입니다.",
    "다음 질문이 부적절하거나 편향적인가요? 판단해주세요.\n\n질문: ${question}",
);

pub const ROUTE_QUERY: ChatPrompt = ChatPrompt::new(
    "너는 유저의 질문을 아주대학교 관련 정보의 다섯 가지 도메인 중 하나로 분류하는 분류기 역할을 한다.
아래 도메인 중 유저의 질문에 가장 적합한 하나를 골라야 한다:

- course: 학과별 개설 과목, 과목명 등 수업 정보
- curriculum: 학과별 졸업 요건, 학과별 학년별 커리큘럼, 학과별 권장이수
- department_intro: 학과 소개, 교수진, 학과 사무실 전화 번호, 학과 사무실 위치, 학과 교육 목표
- employment_status: 취업 현황, 진로, 진출 분야
- other: 위 분류에 해당하지 않을 경우

오직 하나의 도메인만 선택해서 응답하라.",
    "User question: ${question}",
);

pub const EXTRACT_DEPARTMENT: ChatPrompt = ChatPrompt::new(
    "question을 분석했을 때, 학과 리스트에 있는 특정 학과에 대한 질문이라면 해당 학과명을 추출하고, 아니라면 빈 문자열을 반환하세요.
학과 리스트: ${departments}",
    "${question}",
);

pub const CLASSIFY_DEPARTMENT: ChatPrompt = ChatPrompt::new(
    "질문이 특정 학과에 대한 질문인지 판별하고, 학과 리스트에 존재하는지 확인하라.
- 특정 학과에 대한 질문이고 학과 리스트에 있다면: result='valid', departments=['학과명', ...]
- 특정 학과에 대한 질문이지만 학과 리스트에 없다면: result='not_supported', departments=['질문에 포함된 학과명']
- 특정 학과에 대한 질문이 아니면: result='not_specific', departments=[]
여러 학과를 묻는 질문이라면 해당 학과를 모두 departments에 담아라.
학과 리스트: ${departments}",
    "${question}",
);

pub const TRANSFORM_QUERY: ChatPrompt =
    ChatPrompt::new("질문을 더 명확하게 한국어로 재작성해주세요.", "${question}");

/// Long form relevance grader that rejects headings and placeholders
const STRICT_DOCUMENT_GRADER: ChatPrompt = ChatPrompt::new(
    "You are a grader assessing whether a retrieved document is meaningfully relevant to a user question.
Only respond 'yes' if the document contains concrete, informative content (not headings or placeholders) that can directly help answer the question.
Do not mark as relevant if the document contains only general section titles or insufficient information.
Your job is to filter out unhelpful or vague results, not to be lenient.
Respond only with a binary score: 'yes' or 'no'.",
    "User question: ${question}\n\n Retrieved document content:\n\n ${document}",
);

const LENIENT_DOCUMENT_GRADER: ChatPrompt = ChatPrompt::new(
    "You are a grader assessing relevance of a retrieved document to a user question. If the document contains keyword(s) or semantic meaning related to the user question, grade it as relevant.
Respond only with a binary score: 'yes' or 'no'.",
    "Retrieved document: \n\n ${document} \n\n User question: ${question}",
);

const SHORT_DOCUMENT_GRADER: ChatPrompt = ChatPrompt::new(
    "문서가 질문과 관련 있는지 평가하고 'yes' 또는 'no'로 답하세요.",
    "문서: ${document}\n질문: ${question}",
);

const GROUNDEDNESS_GRADER: ChatPrompt = ChatPrompt::new(
    "You are a grader assessing whether an LLM generation is grounded in / supported by a set of retrieved facts.
Give a binary score 'yes' or 'no'. 'Yes' means that the answer is grounded in / supported by the set of facts.",
    "Set of facts: \n\n ${documents} \n\n LLM generation: ${generation}",
);

const RESOLUTION_GRADER: ChatPrompt = ChatPrompt::new(
    "You are a grader assessing whether an answer addresses / resolves a question.
Give a binary score 'yes' or 'no'. 'Yes' means that the answer resolves the question.",
    "User question: \n\n ${question} \n\n LLM generation: ${generation}",
);

const CURRICULUM_GROUNDEDNESS: ChatPrompt = ChatPrompt::new(
    "응답이 문서를 기반으로 작성되었는지 yes/no로 평가해주세요.",
    "응답: ${generation}\n\n문서: ${documents}",
);

const CURRICULUM_RESOLUTION: ChatPrompt = ChatPrompt::new(
    "응답이 질문에 적절한 답변인지 평가해주세요. yes 또는 no로 답해주세요.",
    "질문: ${question}\n응답: ${generation}",
);

const SHORT_GROUNDEDNESS: ChatPrompt = ChatPrompt::new(
    "응답이 문서를 기반으로 작성되었는지 평가하세요. yes 또는 no로 답하세요.",
    "응답: ${generation}\n문서: ${documents}",
);

const SHORT_RESOLUTION: ChatPrompt = ChatPrompt::new(
    "응답이 질문에 적절한지 평가하세요. yes 또는 no로 답하세요.",
    "질문: ${question}\n응답: ${generation}",
);

const COURSE_GENERATE: ChatPrompt = ChatPrompt::new(
    "다음 문서를 참고하여 질문에 답변을 생성하세요.
만약, 문서 내에서 특정 과목에 대한 내용을 참고하여 답변을 생성한다면, 과목 코드를 참고하여 해당 과목이 몇 학년 때 수강하기를 권장하는 지에 대한 정보도 함께 제공하세요. 과목 코드는 영어 알파벳 3~4글자 + 숫자 3~4글자로 구성되며, 맨 처음 숫자가 해당 과목의 권장 수강 학년입니다.",
    "문서들: ${documents}\n\n질문: ${question}",
);

const CURRICULUM_GENERATE: ChatPrompt = ChatPrompt::new(
    "다음 문서를 참고하여 질문에 답변을 생성하세요.",
    "문서들: ${documents}\n\n질문: ${question}",
);

const SHORT_GENERATE: ChatPrompt = ChatPrompt::new(
    "문서를 참고하여 질문에 답하세요.",
    "문서: ${documents}\n질문: ${question}",
);

/// Prompts that differ between domain pipelines
#[derive(Debug, Clone, Copy)]
pub struct DomainPrompts {
    pub grade_document: ChatPrompt,
    pub generate: ChatPrompt,
    pub groundedness: ChatPrompt,
    pub resolution: ChatPrompt,
    /// Separator used when passages are joined into one context block
    pub document_separator: &'static str,
}

impl DomainPrompts {
    pub fn for_domain(domain: QueryDomain) -> Self {
        match domain {
            QueryDomain::Course => Self {
                grade_document: STRICT_DOCUMENT_GRADER,
                generate: COURSE_GENERATE,
                groundedness: GROUNDEDNESS_GRADER,
                resolution: RESOLUTION_GRADER,
                document_separator: "\n\n",
            },
            QueryDomain::Curriculum => Self {
                grade_document: LENIENT_DOCUMENT_GRADER,
                generate: CURRICULUM_GENERATE,
                groundedness: CURRICULUM_GROUNDEDNESS,
                resolution: CURRICULUM_RESOLUTION,
                document_separator: "\n\n",
            },
            QueryDomain::EmploymentStatus => Self {
                grade_document: STRICT_DOCUMENT_GRADER,
                generate: SHORT_GENERATE,
                groundedness: GROUNDEDNESS_GRADER,
                resolution: RESOLUTION_GRADER,
                document_separator: "\n",
            },
            QueryDomain::DepartmentIntro | QueryDomain::Other => Self {
                grade_document: SHORT_DOCUMENT_GRADER,
                generate: SHORT_GENERATE,
                groundedness: SHORT_GROUNDEDNESS,
                resolution: SHORT_RESOLUTION,
                document_separator: "\n",
            },
        }
    }
}

/// Department catalog as listed in extraction prompts
pub fn department_catalog() -> String {
    Department::catalog()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageRole;

    #[test]
    fn test_render_fills_placeholders() {
        let messages = STRICT_DOCUMENT_GRADER
            .render(&[("question", "졸업 요건"), ("document", "130학점")])
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert!(messages[1].content.contains("User question: 졸업 요건"));
        assert!(messages[1].content.contains("130학점"));
        assert!(!messages[1].content.contains("${"));
    }

    #[test]
    fn test_missing_variable_is_an_error() {
        let result = TRANSFORM_QUERY.render(&[]);

        match result {
            Err(DomainError::Internal { message }) => assert!(message.contains("question")),
            other => panic!("expected missing variable error, got {:?}", other),
        }
    }

    #[test]
    fn test_placeholder_inside_value_stays_literal() {
        let question = "템플릿 문법 ${document} 는 무엇인가요?";
        let messages = SHORT_DOCUMENT_GRADER
            .render(&[("question", question), ("document", "학과 사무실: 팔달관")])
            .unwrap();

        assert_eq!(
            messages[1].content,
            "문서: 학과 사무실: 팔달관\n질문: 템플릿 문법 ${document} 는 무엇인가요?"
        );
    }

    #[test]
    fn test_document_containing_placeholder_is_not_expanded() {
        let messages = SHORT_DOCUMENT_GRADER
            .render(&[("document", "예시: ${question}"), ("question", "졸업 요건")])
            .unwrap();

        assert!(messages[1].content.starts_with("문서: 예시: ${question}\n"));
    }

    #[test]
    fn test_extraction_prompt_lists_catalog() {
        let messages = EXTRACT_DEPARTMENT
            .render(&[("departments", &department_catalog()), ("question", "q")])
            .unwrap();
        assert!(messages[0].content.contains("국방디지털융합학과"));
    }

    #[test]
    fn test_domain_prompts_render_with_caller_variables() {
        for domain in QueryDomain::ALL.into_iter().filter(QueryDomain::is_answerable) {
            let prompts = DomainPrompts::for_domain(domain);
            let pairs = [
                (prompts.grade_document, [("question", "q"), ("document", "d")]),
                (prompts.generate, [("documents", "d"), ("question", "q")]),
                (prompts.groundedness, [("documents", "d"), ("generation", "g")]),
                (prompts.resolution, [("question", "q"), ("generation", "g")]),
            ];

            for (prompt, vars) in pairs {
                assert!(prompt.render(&vars).is_ok(), "{} prompt failed to render", domain.as_str());
            }
        }
    }

    #[test]
    fn test_course_prompt_mentions_course_code() {
        let prompts = DomainPrompts::for_domain(QueryDomain::Course);
        assert!(prompts.generate.system.contains("과목 코드"));
        assert_eq!(prompts.document_separator, "\n\n");
    }
}
