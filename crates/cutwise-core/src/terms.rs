//! Per-language terminology tables and fixed prompt blocks.
//!
//! One table per supported output language drives the single prompt
//! builder in [`crate::prompt`]: enum-value lookups (length, form, volume,
//! fringe, face shape) plus the fixed blocks every prompt carries (role
//! header, security rules, closing instruction). Missing lookups fall back
//! to the raw internal value unchanged; missing parameters fall back to the
//! table's generic placeholder phrase.
//!
//! Korean, English, and Vietnamese carry full lookup tables; Japanese and
//! Chinese carry the fixed blocks and fall back to raw values elsewhere.

use crate::models::Language;

/// Localized phrases substituted for internal codes during output redaction.
pub struct RedactionTerms {
    pub back_technique: &'static str,
    pub front_technique: &'static str,
    pub center_technique: &'static str,
    pub top_technique: &'static str,
    pub crown_technique: &'static str,
    pub nape_technique: &'static str,
    pub upper_part: &'static str,
    pub back_part: &'static str,
    pub front_part: &'static str,
    pub center_part: &'static str,
    pub nape_part: &'static str,
    pub crown_part: &'static str,
    pub angle_phrase: &'static str,
    pub direction_phrase: &'static str,
    pub systematic_structure: &'static str,
    pub professional_classification: &'static str,
}

/// All fixed text a prompt needs for one language.
pub struct LanguageTerms {
    pub role_header: &'static str,
    pub security_rules: &'static str,
    pub closing: &'static str,
    /// System message pinning the generation model to the target language.
    pub system_instruction: &'static str,
    /// Canned answer for questions probing the proprietary formula system.
    pub refusal: &'static str,
    /// Generic phrase substituted for missing style parameters.
    pub placeholder: &'static str,

    pub heading_analysis: &'static str,
    pub heading_procedure: &'static str,
    pub heading_texturizing: &'static str,
    pub heading_styling: &'static str,
    pub heading_advisory: &'static str,

    pub label_length: &'static str,
    pub label_form: &'static str,
    pub label_volume: &'static str,
    pub label_fringe: &'static str,
    pub label_texture: &'static str,
    pub label_silhouette: &'static str,
    pub label_face_shapes: &'static str,
    pub label_sectioning: &'static str,
    pub label_lifting: &'static str,
    pub label_technique: &'static str,
    pub label_goal: &'static str,
    pub label_reference: &'static str,
    pub label_trim_cycle: &'static str,
    pub unit_weeks: &'static str,

    /// Names of the five fixed procedure stages used when no reference
    /// chunks are available: nape, back, side, crown, fringe.
    pub default_stages: [&'static str; 5],

    pub redact: RedactionTerms,
}

static KO: LanguageTerms = LanguageTerms {
    role_header: "당신은 투웨이 컷 시스템의 마스터 헤어 스타일리스트입니다.",
    security_rules: "\
**🔒 보안 규칙 (철저히 준수):**
다음 용어들은 절대 언급 금지하되, 원리는 레시피에 반영하세요:
- 포뮬러 번호 (DBS NO.3, VS NO.6 등) → \"뒷머리 기법\", \"중앙 기법\"으로 표현
- 각도 코드 (L2(45°), D4(180°) 등) → 각도 숫자는 명시하되 코드는 숨김
- 섹션 이름 (가로섹션, 후대각섹션 등) → \"상단 부분\", \"뒷머리 부분\"으로 표현
- 층 구조와 섹션 시스템 → \"체계적인 구조\"로 표현
- 매트릭스 분류 → \"전문적인 분류\"로 표현",
    closing: "모든 내용은 **한국어로만** 작성하고, 형식에 대한 설명이나 메타 코멘트 없이 \
레시피 본문만 작성하세요. 실제 살롱에서 바로 적용 가능한 구체적 지시사항을 제공하세요.",
    system_instruction: "당신은 한국어 전문 헤어 스타일리스트입니다. 모든 응답을 한국어로만 작성하세요.",
    refusal: "죄송합니다. 해당 정보는 투웨이 컷 시스템의 핵심 영업 기밀입니다.\n\n대신 이런 질문은 \
어떠세요?\n• \"레이어 컷의 기본 원리는?\"\n• \"얼굴형별 추천 스타일\"\n• \"헤어 길이 분류 시스템\"",
    placeholder: "자연스러운 스타일",
    heading_analysis: "분석 결과",
    heading_procedure: "상세 커팅 프로세스",
    heading_texturizing: "질감 처리",
    heading_styling: "스타일링 가이드",
    heading_advisory: "얼굴형·모질별 조언",
    label_length: "기장",
    label_form: "형태",
    label_volume: "볼륨",
    label_fringe: "앞머리",
    label_texture: "질감",
    label_silhouette: "실루엣",
    label_face_shapes: "어울리는 얼굴형",
    label_sectioning: "분할",
    label_lifting: "리프팅",
    label_technique: "커팅 기법",
    label_goal: "목표",
    label_reference: "참고",
    label_trim_cycle: "다듬기 주기",
    unit_weeks: "주",
    default_stages: [
        "목 부위 - 기준선 설정",
        "뒷머리 부분 - 그래쥬에이션/레이어 형성",
        "사이드 부분 - 얼굴 라인 연출",
        "상단 부분 - 볼륨 포인트",
        "앞머리 - 디테일 완성",
    ],
    redact: RedactionTerms {
        back_technique: "뒷머리 기법",
        front_technique: "앞머리 기법",
        center_technique: "중앙 기법",
        top_technique: "상단 기법",
        crown_technique: "정수리 기법",
        nape_technique: "목 부위 기법",
        upper_part: "상단 부분",
        back_part: "뒷머리 부분",
        front_part: "앞쪽 부분",
        center_part: "중앙 부분",
        nape_part: "목 부위",
        crown_part: "정수리 부분",
        angle_phrase: "적절한 각도로",
        direction_phrase: "자연스러운 방향으로",
        systematic_structure: "체계적인 구조",
        professional_classification: "전문적인 분류",
    },
};

static EN: LanguageTerms = LanguageTerms {
    role_header: "You are a master hair stylist of the two-way cut system.",
    security_rules: "\
**🔒 Security rules (strictly enforced):**
Never mention the following terms; reflect only their effects in the recipe:
- Formula numbers (DBS NO.3, VS NO.6, etc.) → say \"back technique\", \"center technique\"
- Angle codes (L2(45°), D4(180°), etc.) → state the angle in degrees, hide the code
- Section names (horizontal section, diagonal-backward section, etc.) → say \"upper part\", \"back part\"
- Layer-structure and section-system internals → say \"systematic structure\"
- Matrix classifications → say \"professional classification\"",
    closing: "Write everything in **English only**. Output only the recipe body, with no \
meta-commentary about the format. Give concrete instructions a stylist can apply in the salon.",
    system_instruction: "You are a professional hair stylist. Write every response in English only.",
    refusal: "I apologize, but that information is proprietary to the two-way cut system.\n\n\
How about these questions instead?\n• \"Basic principles of layer cut\"\n• \"Recommended styles by face shape\"",
    placeholder: "a natural style",
    heading_analysis: "Analysis",
    heading_procedure: "Detailed cutting process",
    heading_texturizing: "Texturizing",
    heading_styling: "Styling guide",
    heading_advisory: "Face-shape and hair-type advice",
    label_length: "Length",
    label_form: "Form",
    label_volume: "Volume",
    label_fringe: "Fringe",
    label_texture: "Texture",
    label_silhouette: "Silhouette",
    label_face_shapes: "Flattering face shapes",
    label_sectioning: "Sectioning",
    label_lifting: "Lifting",
    label_technique: "Cutting technique",
    label_goal: "Goal",
    label_reference: "Reference",
    label_trim_cycle: "Trim cycle",
    unit_weeks: "weeks",
    default_stages: [
        "Nape area - baseline setting",
        "Back area - graduation/layer building",
        "Side area - face-line shaping",
        "Crown area - volume point",
        "Fringe - detail finishing",
    ],
    redact: RedactionTerms {
        back_technique: "back technique",
        front_technique: "front technique",
        center_technique: "center technique",
        top_technique: "top technique",
        crown_technique: "crown technique",
        nape_technique: "nape technique",
        upper_part: "upper part",
        back_part: "back part",
        front_part: "front part",
        center_part: "center part",
        nape_part: "nape area",
        crown_part: "crown area",
        angle_phrase: "at a suitable angle",
        direction_phrase: "in a natural direction",
        systematic_structure: "systematic structure",
        professional_classification: "professional classification",
    },
};

static JA: LanguageTerms = LanguageTerms {
    role_header: "あなたはツーウェイカットシステムのマスター・ヘアスタイリストです。",
    security_rules: "\
**🔒 セキュリティルール (厳守):**
次の用語は絶対に言及せず、原理のみをレシピに反映してください:
- フォーミュラ番号 (DBS NO.3, VS NO.6 など) → 「後部テクニック」「中央テクニック」と表現
- 角度コード (L2(45°), D4(180°) など) → 角度の数値のみ記載し、コードは隠す
- セクション名 → 「上部」「後部」と表現
- レイヤー構造とセクションシステムの内部 → 「体系的な構造」と表現
- マトリックス分類 → 「専門的な分類」と表現",
    closing: "すべて**日本語のみ**で書いてください。形式についての説明やメタコメントは不要で、\
レシピ本文だけを書いてください。",
    system_instruction: "あなたはプロのヘアスタイリストです。すべての応答を日本語のみで書いてください。",
    refusal: "申し訳ございませんが、その情報はツーウェイカットシステムの企業秘密です。",
    placeholder: "自然なスタイル",
    heading_analysis: "分析結果",
    heading_procedure: "詳細カットプロセス",
    heading_texturizing: "質感調整",
    heading_styling: "スタイリングガイド",
    heading_advisory: "顔型・髪質別アドバイス",
    label_length: "長さ",
    label_form: "形態",
    label_volume: "ボリューム",
    label_fringe: "前髪",
    label_texture: "質感",
    label_silhouette: "シルエット",
    label_face_shapes: "似合う顔型",
    label_sectioning: "セクション分け",
    label_lifting: "リフティング",
    label_technique: "カット技法",
    label_goal: "目標",
    label_reference: "参考",
    label_trim_cycle: "メンテナンス周期",
    unit_weeks: "週間",
    default_stages: [
        "えり足 - ベースライン設定",
        "後部 - グラデーション/レイヤー形成",
        "サイド - 顔まわりの演出",
        "トップ - ボリュームポイント",
        "前髪 - ディテール仕上げ",
    ],
    redact: RedactionTerms {
        back_technique: "後部テクニック",
        front_technique: "前部テクニック",
        center_technique: "中央テクニック",
        top_technique: "上部テクニック",
        crown_technique: "トップテクニック",
        nape_technique: "えり足テクニック",
        upper_part: "上部",
        back_part: "後部",
        front_part: "前部",
        center_part: "中央部",
        nape_part: "えり足",
        crown_part: "トップ",
        angle_phrase: "適切な角度で",
        direction_phrase: "自然な方向に",
        systematic_structure: "体系的な構造",
        professional_classification: "専門的な分類",
    },
};

static ZH: LanguageTerms = LanguageTerms {
    role_header: "你是双向剪裁系统的大师级发型师。",
    security_rules: "\
**🔒 安全规则 (严格遵守):**
以下术语绝对禁止提及，只在配方中体现其原理:
- 公式编号 (DBS NO.3, VS NO.6 等) → 用「后部技法」「中央技法」表达
- 角度代码 (L2(45°), D4(180°) 等) → 只写角度数字，隐藏代码
- 分区名称 → 用「上部」「后部」表达
- 层次结构与分区系统内部 → 用「系统化结构」表达
- 矩阵分类 → 用「专业分类」表达",
    closing: "全部内容只用**中文**书写，不要添加关于格式的说明或元评论，只输出配方正文。",
    system_instruction: "你是专业发型师。所有回复只用中文书写。",
    refusal: "抱歉，该信息属于双向剪裁系统的核心商业机密。",
    placeholder: "自然的风格",
    heading_analysis: "分析结果",
    heading_procedure: "详细剪裁流程",
    heading_texturizing: "质感处理",
    heading_styling: "造型指南",
    heading_advisory: "脸型与发质建议",
    label_length: "长度",
    label_form: "形态",
    label_volume: "蓬松度",
    label_fringe: "刘海",
    label_texture: "质感",
    label_silhouette: "轮廓",
    label_face_shapes: "适合脸型",
    label_sectioning: "分区",
    label_lifting: "提拉",
    label_technique: "剪裁技法",
    label_goal: "目标",
    label_reference: "参考",
    label_trim_cycle: "修剪周期",
    unit_weeks: "周",
    default_stages: [
        "颈部 - 基准线设定",
        "后部 - 渐变/层次塑造",
        "侧面 - 脸部线条修饰",
        "顶部 - 蓬松度重点",
        "刘海 - 细节完成",
    ],
    redact: RedactionTerms {
        back_technique: "后部技法",
        front_technique: "前部技法",
        center_technique: "中央技法",
        top_technique: "上部技法",
        crown_technique: "头顶技法",
        nape_technique: "颈部技法",
        upper_part: "上部",
        back_part: "后部",
        front_part: "前部",
        center_part: "中央部",
        nape_part: "颈部",
        crown_part: "头顶",
        angle_phrase: "以适当角度",
        direction_phrase: "沿自然方向",
        systematic_structure: "系统化结构",
        professional_classification: "专业分类",
    },
};

static VI: LanguageTerms = LanguageTerms {
    role_header: "Bạn là bậc thầy tạo mẫu tóc của hệ thống cắt hai chiều.",
    security_rules: "\
**🔒 Quy tắc bảo mật (tuân thủ nghiêm ngặt):**
Các thuật ngữ sau tuyệt đối cấm đề cập, nhưng nguyên tắc phải được phản ánh trong công thức:
- Số công thức (DBS NO.3, VS NO.6, v.v.) → Dùng \"kỹ thuật phần sau\", \"kỹ thuật trung tâm\"
- Mã góc (L2(45°), D4(180°), v.v.) → Nêu số góc nhưng ẩn mã
- Tên phân khu (Phân ngang, Phân chéo sau, v.v.) → Dùng \"phần trên\", \"phần sau\"
- Cấu trúc lớp và hệ thống phân khu → Dùng \"cấu trúc có hệ thống\"
- Phân loại ma trận → Dùng \"phân loại chuyên nghiệp\"",
    closing: "Viết toàn bộ nội dung **chỉ bằng tiếng Việt**, không thêm bình luận về định dạng, \
chỉ xuất phần thân công thức. Đưa ra chỉ dẫn cụ thể có thể áp dụng ngay tại salon.",
    system_instruction: "Bạn là nhà tạo mẫu tóc chuyên nghiệp. Viết mọi phản hồi chỉ bằng tiếng Việt.",
    refusal: "Xin lỗi, thông tin đó là bí mật kinh doanh cốt lõi của hệ thống cắt hai chiều.",
    placeholder: "phong cách tự nhiên",
    heading_analysis: "Kết quả phân tích",
    heading_procedure: "Quy trình cắt chi tiết",
    heading_texturizing: "Xử lý kết cấu",
    heading_styling: "Hướng dẫn tạo kiểu",
    heading_advisory: "Tư vấn theo khuôn mặt và chất tóc",
    label_length: "Chiều dài",
    label_form: "Hình dạng",
    label_volume: "Thể tích",
    label_fringe: "Mái",
    label_texture: "Kết cấu",
    label_silhouette: "Đường nét",
    label_face_shapes: "Khuôn mặt phù hợp",
    label_sectioning: "Phân khu",
    label_lifting: "Nâng",
    label_technique: "Kỹ thuật cắt",
    label_goal: "Mục tiêu",
    label_reference: "Tham khảo",
    label_trim_cycle: "Chu kỳ cắt tỉa",
    unit_weeks: "tuần",
    default_stages: [
        "Vùng gáy - Thiết lập đường cơ sở",
        "Phần sau - Tầng nấc hoặc lớp",
        "Phần bên - Tạo đường viền khuôn mặt",
        "Phần trên - Điểm nhấn thể tích",
        "Mái - Hoàn thiện chi tiết",
    ],
    redact: RedactionTerms {
        back_technique: "kỹ thuật phần sau",
        front_technique: "kỹ thuật phần trước",
        center_technique: "kỹ thuật trung tâm",
        top_technique: "kỹ thuật phần trên",
        crown_technique: "kỹ thuật đỉnh đầu",
        nape_technique: "kỹ thuật vùng gáy",
        upper_part: "phần trên",
        back_part: "phần sau",
        front_part: "phần trước",
        center_part: "phần giữa",
        nape_part: "vùng gáy",
        crown_part: "đỉnh đầu",
        angle_phrase: "với góc phù hợp",
        direction_phrase: "theo hướng tự nhiên",
        systematic_structure: "cấu trúc có hệ thống",
        professional_classification: "phân loại chuyên nghiệp",
    },
};

/// Look up the terminology table for a language.
pub fn terms(language: Language) -> &'static LanguageTerms {
    match language {
        Language::Korean => &KO,
        Language::English => &EN,
        Language::Japanese => &JA,
        Language::Chinese => &ZH,
        Language::Vietnamese => &VI,
    }
}

/// Localized description of a length category code (`"A Length"`…`"H Length"`).
pub fn length_desc(language: Language, code: &str) -> Option<&'static str> {
    match language {
        Language::Korean => match code {
            "A Length" => Some("가슴 아래 밑선"),
            "B Length" => Some("가슴 상단~중간"),
            "C Length" => Some("쇄골 밑선"),
            "D Length" => Some("어깨선"),
            "E Length" => Some("어깨 위 2-3cm"),
            "F Length" => Some("턱뼈 아래"),
            "G Length" => Some("턱선"),
            "H Length" => Some("귀 높이"),
            _ => None,
        },
        Language::English => match code {
            "A Length" => Some("Below chest"),
            "B Length" => Some("Mid-chest"),
            "C Length" => Some("Below collarbone"),
            "D Length" => Some("Shoulder line"),
            "E Length" => Some("2-3cm above shoulder"),
            "F Length" => Some("Below jaw"),
            "G Length" => Some("Jaw line"),
            "H Length" => Some("Ear level"),
            _ => None,
        },
        Language::Vietnamese => match code {
            "A Length" => Some("Dưới ngực"),
            "B Length" => Some("Ngang ngực"),
            "C Length" => Some("Dưới xương quai xanh"),
            "D Length" => Some("Ngang vai"),
            "E Length" => Some("Trên vai 2-3cm"),
            "F Length" => Some("Dưới cằm"),
            "G Length" => Some("Ngang cằm"),
            "H Length" => Some("Ngang tai"),
            _ => None,
        },
        _ => None,
    }
}

/// Localized description of a cut form, keyed by its leading letter.
pub fn form_desc(language: Language, form: &str) -> Option<&'static str> {
    let initial = form.chars().next()?;
    match language {
        Language::Korean => match initial {
            'O' => Some("원렝스"),
            'G' => Some("그래쥬에이션"),
            'L' => Some("레이어"),
            _ => None,
        },
        Language::English => match initial {
            'O' => Some("One Length"),
            'G' => Some("Graduation"),
            'L' => Some("Layer"),
            _ => None,
        },
        Language::Vietnamese => match initial {
            'O' => Some("Một độ dài"),
            'G' => Some("Tầng nấc"),
            'L' => Some("Tỉa lớp"),
            _ => None,
        },
        _ => None,
    }
}

/// Localized description of a volume zone (`"Low"`, `"Medium"`, `"High"`).
pub fn volume_desc(language: Language, zone: &str) -> Option<&'static str> {
    match language {
        Language::Korean => match zone {
            "Low" => Some("하단 볼륨 (0~44도)"),
            "Medium" => Some("중단 볼륨 (45~89도)"),
            "High" => Some("상단 볼륨 (90도 이상)"),
            _ => None,
        },
        Language::English => match zone {
            "Low" => Some("Low volume (0-44°)"),
            "Medium" => Some("Medium volume (45-89°)"),
            "High" => Some("High volume (90°+)"),
            _ => None,
        },
        Language::Vietnamese => match zone {
            "Low" => Some("Thể tích thấp (0-44°)"),
            "Medium" => Some("Thể tích trung (45-89°)"),
            "High" => Some("Thể tích cao (90°+)"),
            _ => None,
        },
        _ => None,
    }
}

/// Localized description of a face shape.
pub fn face_shape_desc(language: Language, shape: &str) -> Option<&'static str> {
    match language {
        Language::Korean => match shape {
            "Oval" => Some("계란형"),
            "Round" => Some("둥근형"),
            "Square" => Some("사각형"),
            "Heart" => Some("하트형"),
            "Long" => Some("긴 얼굴형"),
            "Diamond" => Some("다이아몬드형"),
            _ => None,
        },
        Language::English => match shape {
            "Oval" => Some("Oval"),
            "Round" => Some("Round"),
            "Square" => Some("Square"),
            "Heart" => Some("Heart"),
            "Long" => Some("Long"),
            "Diamond" => Some("Diamond"),
            _ => None,
        },
        Language::Vietnamese => match shape {
            "Oval" => Some("Mặt trái xoan"),
            "Round" => Some("Mặt tròn"),
            "Square" => Some("Mặt vuông"),
            "Heart" => Some("Mặt trái tim"),
            "Long" => Some("Mặt dài"),
            "Diamond" => Some("Mặt kim cương"),
            _ => None,
        },
        _ => None,
    }
}

/// Localized description of a fringe type.
pub fn fringe_desc(language: Language, fringe: &str) -> Option<&'static str> {
    match language {
        Language::Korean => match fringe {
            "No Fringe" => Some("앞머리 없음"),
            "Side Bang" => Some("사이드 뱅"),
            "See-through Bang" => Some("시스루 뱅"),
            "Curtain Bang" => Some("커튼 뱅"),
            "Full Bang" => Some("풀 뱅"),
            _ => None,
        },
        Language::English => match fringe {
            "No Fringe" => Some("No fringe"),
            "Side Bang" => Some("Side-swept fringe"),
            "See-through Bang" => Some("See-through fringe"),
            "Curtain Bang" => Some("Curtain fringe"),
            "Full Bang" => Some("Full fringe"),
            _ => None,
        },
        Language::Vietnamese => match fringe {
            "No Fringe" => Some("Không mái"),
            "Side Bang" => Some("Mái lệch"),
            "See-through Bang" => Some("Mái thưa"),
            "Curtain Bang" => Some("Mái rèm"),
            "Full Bang" => Some("Mái bằng"),
            _ => None,
        },
        _ => None,
    }
}

impl Language {
    /// Guess the language of free text from its script ranges.
    ///
    /// Hangul → Korean, kana → Japanese, CJK ideographs (without kana) →
    /// Chinese, Vietnamese diacritics → Vietnamese, otherwise English.
    pub fn detect(text: &str) -> Language {
        let mut has_cjk = false;
        for c in text.chars() {
            match c {
                '\u{AC00}'..='\u{D7A3}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}' => {
                    return Language::Korean;
                }
                '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' => return Language::Japanese,
                '\u{4E00}'..='\u{9FFF}' => has_cjk = true,
                _ => {}
            }
        }
        if has_cjk {
            return Language::Chinese;
        }
        const VI_MARKS: &str = "ăâêôơưđàáảãạằắẳẵặầấẩẫậèéẻẽẹềếểễệìíỉĩịòóỏõọồốổỗộờớởỡợùúủũụừứửữựỳýỷỹỵ";
        if text
            .chars()
            .any(|c| VI_MARKS.chars().any(|m| m == c.to_lowercase().next().unwrap_or(c)))
        {
            return Language::Vietnamese;
        }
        Language::English
    }
}
